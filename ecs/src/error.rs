use thiserror::Error;

use crate::entity::Entity;
use crate::reference::RefSlot;

/// Errors returned by [`World`](crate::World) and [`Operation`](crate::Operation).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    #[error("Component type `{type_name}` has never been registered. Call register_component() first.")]
    ComponentNotRegistered { type_name: &'static str },
    #[error("Entity {0} is not alive")]
    DeadEntity(Entity),
    #[error("Entity {owner} has no reference in slot {slot}")]
    UnknownReference { owner: Entity, slot: RefSlot },
}

pub type EcsResult<T> = Result<T, EcsError>;
