//! # Vantage Standard Components and Systems
//!
//! Standard components and per-tick systems built on [`vantage_ecs`].
//!
//! ## Components
//!
//! - [`Transform`] / [`GlobalTransform`]: Entity positioning (local TRS + world matrix)
//! - [`CameraSettings`]: Authored projection kind, size and depth range
//! - [`CameraMatrices`]: View and projection matrices derived each tick
//! - [`Viewport`]: Camera-side reference slot to its render destination
//! - [`Destination`]: Pixel size of a render destination
//!
//! ## Systems
//!
//! - [`UpdateGlobalTransforms`]: Computes world matrices
//! - [`CameraSystem`]: Provisions and recomputes camera matrices
//!
//! ## Example
//!
//! ```ignore
//! let mut world = World::new();
//! register_std_components(&mut world);
//!
//! let target = world.spawn();
//! world.insert(target, Destination::new(800, 600))?;
//!
//! let camera = world.spawn();
//! let slot = world.add_reference(camera, target)?;
//! world.insert(camera, Transform::from_translation(Vec3::new(0.0, 2.0, 10.0)))?;
//! world.insert(camera, CameraSettings::perspective(60f32.to_radians(), 0.1, 1000.0))?;
//! world.insert(camera, Viewport::new(slot))?;
//!
//! let mut schedule = Schedule::new();
//! schedule.add(UpdateGlobalTransforms::new());
//! schedule.add(CameraSystem::new());
//! schedule.run(&mut world)?;
//! ```

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::{
    CameraError, CameraSystem, CameraSystemConfig, DestinationSnapshot, EvaluationReport,
    UnresolvedViewport, UpdateGlobalTransforms,
};

/// Register all standard component types with the world.
///
/// Systems register what they touch on their own, but registering up front
/// lets callers insert components before the first tick.
pub fn register_std_components(world: &mut vantage_ecs::World) {
    world.register_component::<Transform>();
    world.register_component::<GlobalTransform>();
    world.register_component::<CameraSettings>();
    world.register_component::<CameraMatrices>();
    world.register_component::<Viewport>();
    world.register_component::<Destination>();
}
