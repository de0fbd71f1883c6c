use vantage_ecs::{
    Component, EcsError, Entity, Operation, RefSlot, ResolveReference, Schedule, System,
    SystemError, SystemResult, World,
};

// ---------------------------------------------------------------------------
// Test components (derived, as downstream crates do)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Component)]
struct Size {
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Component)]
struct Settings {
    scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Component)]
struct Derived {
    value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Component)]
struct Link {
    target: RefSlot,
}

fn world() -> World {
    let mut world = World::new();
    world.register_component::<Size>();
    world.register_component::<Settings>();
    world.register_component::<Derived>();
    world.register_component::<Link>();
    world
}

// ---------------------------------------------------------------------------
// Two-phase structural changes
// ---------------------------------------------------------------------------

#[test]
fn scan_then_perform() {
    let mut world = world();
    let settings = world.component_id::<Settings>().unwrap();
    let derived = world.component_id::<Derived>().unwrap();

    let with_settings: Vec<Entity> = (0..5)
        .map(|i| {
            let e = world.spawn();
            world.insert(e, Settings { scale: i as f32 }).unwrap();
            e
        })
        .collect();
    let plain = world.spawn();
    world.insert(plain, Size::default()).unwrap();

    let mut operation = Operation::new();
    for group in world.groups() {
        if group.contains(settings) && !group.contains(derived) {
            operation.select_many(group.entities());
        }
    }
    operation.add_component::<Derived>();
    assert_eq!(operation.perform(&mut world).unwrap(), 5);
    operation.reset();
    assert!(operation.is_empty());

    for e in with_settings {
        assert_eq!(world.get::<Derived>(e), Some(&Derived::default()));
    }
    assert!(!world.contains::<Derived>(plain));

    // Both groups changed shape
    let groups = world.groups();
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().any(|g| g.contains(settings) && g.contains(derived)));
}

#[test]
fn failed_operation_applies_nothing() {
    let mut world = world();
    let alive = world.spawn();
    let dead = world.spawn();
    world.despawn(dead);

    let mut operation = Operation::new();
    operation.select(alive);
    operation.select(dead);
    operation.add_component::<Derived>();

    assert_eq!(
        operation.perform(&mut world),
        Err(EcsError::DeadEntity(dead))
    );
    assert!(!world.contains::<Derived>(alive));
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

#[test]
fn reference_slots_follow_generations() {
    let mut world = world();
    let owner = world.spawn();
    let target = world.spawn();
    world.insert(target, Size { width: 4, height: 2 }).unwrap();

    let slot = world.add_reference(owner, target).unwrap();
    world.insert(owner, Link { target: slot }).unwrap();

    let link = *world.get::<Link>(owner).unwrap();
    let resolved = world.resolve_reference(owner, link.target).unwrap();
    assert!(world.contains_entity(resolved));
    assert_eq!(world.get::<Size>(resolved).unwrap().width, 4);

    world.despawn(target);
    let reused = world.spawn();
    assert_eq!(reused.index(), target.index());

    // The slot still names the old generation
    let stale = world.resolve_reference(owner, link.target).unwrap();
    assert_eq!(stale, target);
    assert!(!world.contains_entity(stale));
}

#[test]
fn despawn_drops_reference_table() {
    let mut world = world();
    let owner = world.spawn();
    let target = world.spawn();
    world.add_reference(owner, target).unwrap();
    assert_eq!(world.reference_count(owner), 1);

    world.despawn(owner);
    let reused = world.spawn();
    assert_eq!(reused.index(), owner.index());
    assert_eq!(world.reference_count(reused), 0);
    assert_eq!(world.reference(reused, RefSlot::from_raw(1)), None);
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Adds a `Derived` to every `Settings` entity.
#[derive(Default)]
struct Provision {
    pending: Operation,
}

impl System for Provision {
    fn run(&mut self, world: &mut World) -> SystemResult {
        let settings = world.register_component::<Settings>();
        let derived = world.register_component::<Derived>();
        for group in world.groups() {
            if group.contains(settings) && !group.contains(derived) {
                self.pending.select_many(group.entities());
            }
        }
        self.pending.add_component::<Derived>();
        let result = self.pending.perform(world);
        self.pending.reset();
        result
            .map(|_| ())
            .map_err(|err| SystemError::new("Provision", err))
    }
}

/// Writes `Derived = scale * 2` in place.
struct Evaluate;

impl System for Evaluate {
    fn run(&mut self, world: &mut World) -> SystemResult {
        let settings = world
            .read::<Settings>()
            .map_err(|err| SystemError::new(self.name(), err))?;
        let mut derived = world
            .write::<Derived>()
            .map_err(|err| SystemError::new(self.name(), err))?;
        for (idx, value) in derived.iter_mut() {
            if let Some(s) = settings.get(idx) {
                value.value = s.scale * 2.0;
            }
        }
        Ok(())
    }
}

#[test]
fn provision_then_evaluate_in_one_tick() {
    let mut world = world();
    let e = world.spawn();
    world.insert(e, Settings { scale: 1.5 }).unwrap();

    let mut schedule = Schedule::new();
    schedule.add(Provision::default()).add(Evaluate);
    assert!(schedule.contains::<Evaluate>());

    schedule.run(&mut world).unwrap();
    assert_eq!(world.get::<Derived>(e), Some(&Derived { value: 3.0 }));

    assert!(schedule.remove::<Evaluate>());
    assert_eq!(schedule.len(), 1);
}

#[test]
fn derived_reflection() {
    assert_eq!(Size::NAME, "Size");
    assert_eq!(Size::FIELDS.len(), 2);
    assert_eq!(Link::FIELDS[0].name, "target");
}
