use std::any::TypeId;

use crate::system::{System, SystemResult};
use crate::world::World;

struct StoredSystem {
    system: Box<dyn System>,
    type_id: TypeId,
}

/// An ordered list of systems run once per tick.
///
/// Systems run strictly in registration order on the calling thread, each
/// to completion before the next starts. A tick stops at the first failing
/// system and returns its error; later systems do not run for that tick.
///
/// # Example
///
/// ```ignore
/// let mut schedule = Schedule::new();
/// schedule.add(UpdateGlobalTransforms);
/// schedule.add(CameraSystem::new());
///
/// schedule.run(&mut world)?;
/// ```
#[derive(Default)]
pub struct Schedule {
    systems: Vec<StoredSystem>,
    tick: u64,
}

impl Schedule {
    /// Creates a new empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a system to the end of the schedule.
    ///
    /// # Panics
    ///
    /// Panics if a system with the same type has already been added.
    pub fn add<S: System>(&mut self, system: S) -> &mut Self {
        let type_id = TypeId::of::<S>();
        if self.systems.iter().any(|s| s.type_id == type_id) {
            panic!(
                "Duplicate system type: {} is already registered",
                std::any::type_name::<S>()
            );
        }
        self.systems.push(StoredSystem {
            system: Box::new(system),
            type_id,
        });
        self
    }

    /// Removes a system by type. Returns `true` if it was present.
    pub fn remove<S: System>(&mut self) -> bool {
        let type_id = TypeId::of::<S>();
        let before = self.systems.len();
        self.systems.retain(|s| s.type_id != type_id);
        self.systems.len() != before
    }

    /// Returns whether a system of type `S` is scheduled.
    pub fn contains<S: System>(&self) -> bool {
        let type_id = TypeId::of::<S>();
        self.systems.iter().any(|s| s.type_id == type_id)
    }

    /// Names of the scheduled systems, in run order.
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.system.name()).collect()
    }

    /// Number of scheduled systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Number of ticks started so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Runs every system once, in order.
    pub fn run(&mut self, world: &mut World) -> SystemResult {
        vantage_core::profile_scope!("schedule_run");
        self.tick += 1;
        log::trace!("tick {} ({} systems)", self.tick, self.systems.len());

        for stored in &mut self.systems {
            if let Err(err) = stored.system.run(world) {
                log::error!("tick {}: {err}", self.tick);
                return Err(err);
            }
        }
        vantage_core::frame_mark!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::SystemError;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        fn run(&mut self, _world: &mut World) -> SystemResult {
            self.log.lock().unwrap().push(self.label);
            Ok(())
        }
    }

    struct Other(Arc<Mutex<Vec<&'static str>>>);

    impl System for Other {
        fn run(&mut self, _world: &mut World) -> SystemResult {
            self.0.lock().unwrap().push("other");
            Ok(())
        }
    }

    struct Failing;

    impl System for Failing {
        fn run(&mut self, _world: &mut World) -> SystemResult {
            Err(SystemError::new("Failing", "boom"))
        }
    }

    #[test]
    fn runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut schedule = Schedule::new();
        schedule
            .add(Recorder {
                label: "first",
                log: log.clone(),
            })
            .add(Other(log.clone()));

        let mut world = World::new();
        schedule.run(&mut world).unwrap();
        schedule.run(&mut world).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "other", "first", "other"]
        );
        assert_eq!(schedule.tick(), 2);
        assert_eq!(schedule.system_names()[0], "first");
    }

    #[test]
    fn remove_and_contains() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut schedule = Schedule::new();
        schedule.add(Other(log));
        assert!(schedule.contains::<Other>());
        assert!(schedule.remove::<Other>());
        assert!(!schedule.remove::<Other>());
        assert!(schedule.is_empty());
    }

    #[test]
    fn failure_stops_tick() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut schedule = Schedule::new();
        schedule.add(Failing).add(Other(log.clone()));

        let err = schedule.run(&mut World::new()).unwrap_err();
        assert_eq!(err.system, "Failing");
        assert_eq!(err.to_string(), "system `Failing` failed: boom");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "Duplicate system type")]
    fn duplicate_system_panics() {
        let mut schedule = Schedule::new();
        schedule.add(Failing);
        schedule.add(Failing);
    }
}
