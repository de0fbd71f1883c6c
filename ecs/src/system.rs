use std::error::Error as StdError;

use thiserror::Error;

use crate::world::World;

/// Error returned by a failing [`System`].
#[derive(Error, Debug)]
#[error("system `{system}` failed: {source}")]
pub struct SystemError {
    /// Name of the system that failed.
    pub system: &'static str,
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

impl SystemError {
    pub fn new(system: &'static str, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            system,
            source: source.into(),
        }
    }
}

/// Result type returned by [`System::run`].
pub type SystemResult = Result<(), SystemError>;

/// A system that processes entities and components once per tick.
///
/// Systems get exclusive access to the world for the duration of
/// [`run`](System::run), so they may both read component data and apply
/// structural changes. State that must survive between ticks (lookup tables,
/// pending operations) lives in the system value itself.
///
/// # Example
///
/// ```ignore
/// struct Gravity;
///
/// impl System for Gravity {
///     fn run(&mut self, world: &mut World) -> SystemResult {
///         let mut velocities = world
///             .write::<Velocity>()
///             .map_err(|e| SystemError::new(self.name(), e))?;
///         for (_, v) in velocities.iter_mut() {
///             v.y -= 9.81;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait System: 'static {
    /// Human-readable name, used in logs and errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Execute one tick of the system.
    fn run(&mut self, world: &mut World) -> SystemResult;
}
