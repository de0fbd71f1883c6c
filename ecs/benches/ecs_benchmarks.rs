#![allow(dead_code)]

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use vantage_ecs::{Component, FieldInfo, Operation, World};

// ---------------------------------------------------------------------------
// Helper component types
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Default)]
struct Position {
    x: f32,
    y: f32,
}

impl Component for Position {
    const NAME: &'static str = "Position";
    const FIELDS: &'static [FieldInfo] = &[];
}

#[derive(Clone, Copy, Default)]
struct Health(f32);

impl Component for Health {
    const NAME: &'static str = "Health";
    const FIELDS: &'static [FieldInfo] = &[];
}

fn populated_world(count: u32) -> World {
    let mut world = World::new();
    world.register_component::<Position>();
    world.register_component::<Health>();
    for i in 0..count {
        let e = world.spawn();
        world
            .insert(
                e,
                Position {
                    x: i as f32,
                    y: 0.0,
                },
            )
            .unwrap();
        if i % 3 == 0 {
            world.insert(e, Health(100.0)).unwrap();
        }
    }
    world
}

// ---------------------------------------------------------------------------
// Entity spawning
// ---------------------------------------------------------------------------

fn bench_spawn_entities_10k(c: &mut Criterion) {
    c.bench_function("spawn_10k_entities", |b| {
        b.iter_batched(
            World::new,
            |mut world| {
                for _ in 0..10_000 {
                    black_box(world.spawn());
                }
            },
            BatchSize::SmallInput,
        );
    });
}

// ---------------------------------------------------------------------------
// Grouped views
// ---------------------------------------------------------------------------

fn bench_groups_10k(c: &mut Criterion) {
    let world = populated_world(10_000);
    c.bench_function("groups_10k_entities", |b| {
        b.iter(|| black_box(world.groups()));
    });
}

// ---------------------------------------------------------------------------
// Batched structural changes
// ---------------------------------------------------------------------------

fn bench_operation_add_10k(c: &mut Criterion) {
    c.bench_function("operation_add_default_10k", |b| {
        b.iter_batched(
            || populated_world(10_000),
            |mut world| {
                let health = world.component_id::<Health>().unwrap();
                let mut operation = Operation::new();
                for group in world.groups() {
                    if !group.contains(health) {
                        operation.select_many(group.entities());
                    }
                }
                operation.add_component::<Health>();
                black_box(operation.perform(&mut world).unwrap());
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_spawn_entities_10k,
    bench_groups_10k,
    bench_operation_add_10k,
);
criterion_main!(benches);
