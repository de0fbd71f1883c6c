//! # Vantage ECS
//!
//! Entity-component storage used by the Vantage systems.
//!
//! ## Core Types
//!
//! - [`Entity`]: Lightweight generational entity identifier
//! - [`World`]: Container owning entities, component storages and reference tables
//! - [`Ref`] / [`RefMut`]: Borrow-checked access to component storages
//! - [`ComponentId`] / [`ComponentMask`]: Registered component ids and component sets
//! - [`EntityGroup`]: Entities sharing one exact component set
//!
//! ## References
//!
//! - [`RefSlot`]: Per-entity reference slot, [`RefSlot::NULL`] when unset
//! - [`ResolveReference`]: Capability to resolve slots and check liveness
//!
//! ## Structural Changes & Scheduling
//!
//! - [`Operation`]: Pending change set applied as one batch
//! - [`System`] / [`Schedule`]: Per-tick systems run in order

mod component;
mod entity;
mod error;
mod group;
mod operation;
mod reference;
mod schedule;
mod sparse_set;
mod system;
mod world;

pub use component::{Component, ComponentId, ComponentMask, FieldInfo, FieldKind};
pub use ecs_macro::Component;
pub use entity::Entity;
pub use error::{EcsError, EcsResult};
pub use group::EntityGroup;
pub use operation::Operation;
pub use reference::{RefSlot, ResolveReference};
pub use schedule::Schedule;
pub use sparse_set::{Ref, RefMut, SparseSetInner};
pub use system::{System, SystemError, SystemResult};
pub use world::World;
