use vantage_ecs::{EcsResult, Operation, System, SystemError, SystemResult, World};

use crate::components::{GlobalTransform, Transform};

/// System that updates all [`GlobalTransform`] components from local [`Transform`].
///
/// Entities that have a `Transform` but no `GlobalTransform` get one added
/// (as a single batched operation) before the update, so every transformed
/// entity has a world matrix by the time later systems run.
///
/// # Access
///
/// - Reads: `Transform`
/// - Writes: `GlobalTransform`
#[derive(Default)]
pub struct UpdateGlobalTransforms {
    pending: Operation,
}

impl UpdateGlobalTransforms {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for UpdateGlobalTransforms {
    fn name(&self) -> &'static str {
        "UpdateGlobalTransforms"
    }

    fn run(&mut self, world: &mut World) -> SystemResult {
        add_missing_globals(&mut self.pending, world)
            .and_then(|_| update_global_transforms(world))
            .map_err(|err| SystemError::new(self.name(), err))
    }
}

fn add_missing_globals(pending: &mut Operation, world: &mut World) -> EcsResult<usize> {
    vantage_core::profile_function!();

    let local = world.register_component::<Transform>();
    let global = world.register_component::<GlobalTransform>();

    for group in world.groups() {
        if group.contains(local) && !group.contains(global) {
            pending.select_many(group.entities());
        }
    }
    if pending.is_empty() {
        return Ok(0);
    }

    pending.add_component::<GlobalTransform>();
    let result = pending.perform(world);
    pending.reset();
    result
}

fn update_global_transforms(world: &World) -> EcsResult<()> {
    vantage_core::profile_scope!("update_global_transforms");

    let transforms = world.read::<Transform>()?;
    let mut globals = world.write::<GlobalTransform>()?;

    for (idx, transform) in transforms.iter() {
        if let Some(gt) = globals.get_mut(idx) {
            gt.0 = transform.to_matrix();
        }
    }
    Ok(())
}
