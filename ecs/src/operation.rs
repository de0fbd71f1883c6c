use std::any::TypeId;

use crate::component::Component;
use crate::entity::Entity;
use crate::error::{EcsError, EcsResult};
use crate::world::World;

/// Inserts a default value of one component type; returns whether the entity gained it.
type InsertDefaultFn = fn(&mut World, Entity) -> EcsResult<bool>;

struct PendingAddition {
    type_id: TypeId,
    type_name: &'static str,
    insert_default: InsertDefaultFn,
}

/// A pending structural change set.
///
/// Structural changes must not happen while the world is being scanned, so
/// a system first fills an `Operation` during a read-only pass (select
/// entities, name the component types to add) and then applies it in one
/// call to [`perform`](Operation::perform). The operation validates every
/// entity and component type before touching the world, so either the whole
/// batch is applied or none of it is.
///
/// Operations are meant to be kept by the system and reused: call
/// [`reset`](Operation::reset) after performing.
///
/// # Example
///
/// ```ignore
/// let mut operation = Operation::new();
/// for group in world.groups() {
///     if group.contains(settings) && !group.contains(matrices) {
///         operation.select_many(group.entities());
///     }
/// }
/// if !operation.is_empty() {
///     operation.add_component::<CameraMatrices>();
///     operation.perform(&mut world)?;
///     operation.reset();
/// }
/// ```
#[derive(Default)]
pub struct Operation {
    selection: Vec<Entity>,
    additions: Vec<PendingAddition>,
}

impl Operation {
    /// Creates a new empty operation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entity to the selection.
    pub fn select(&mut self, entity: Entity) {
        self.selection.push(entity);
    }

    /// Adds several entities to the selection.
    pub fn select_many(&mut self, entities: &[Entity]) {
        self.selection.extend_from_slice(entities);
    }

    /// Currently selected entities, in selection order.
    pub fn selection(&self) -> &[Entity] {
        &self.selection
    }

    /// Returns the number of selected entities.
    pub fn len(&self) -> usize {
        self.selection.len()
    }

    /// Returns whether no entity is selected.
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Requests that every selected entity gets a default `T` if it does not
    /// have one yet. Existing values are never overwritten.
    pub fn add_component<T: Component + Default>(&mut self) {
        let type_id = TypeId::of::<T>();
        if self.additions.iter().any(|a| a.type_id == type_id) {
            return;
        }
        self.additions.push(PendingAddition {
            type_id,
            type_name: T::NAME,
            insert_default: |world, entity| {
                if world.contains::<T>(entity) {
                    return Ok(false);
                }
                world.insert(entity, T::default())?;
                Ok(true)
            },
        });
    }

    /// Applies the change set to the world.
    ///
    /// Returns the number of selected entities that gained at least one
    /// component.
    ///
    /// # Errors
    ///
    /// - [`EcsError::ComponentNotRegistered`] if a requested type is unknown to the world.
    /// - [`EcsError::DeadEntity`] if a selected entity is no longer alive.
    ///
    /// Nothing is applied when an error is returned.
    pub fn perform(&self, world: &mut World) -> EcsResult<usize> {
        vantage_core::profile_scope!("operation_perform");

        for addition in &self.additions {
            if world.component_id_by_type(addition.type_id).is_none() {
                return Err(EcsError::ComponentNotRegistered {
                    type_name: addition.type_name,
                });
            }
        }
        if let Some(&dead) = self.selection.iter().find(|e| !world.is_alive(**e)) {
            return Err(EcsError::DeadEntity(dead));
        }

        let mut changed = 0;
        for &entity in &self.selection {
            let mut gained = false;
            for addition in &self.additions {
                gained |= (addition.insert_default)(world, entity)?;
            }
            if gained {
                changed += 1;
            }
        }

        log::debug!(
            "operation added {} component type(s) to {} of {} selected entities",
            self.additions.len(),
            changed,
            self.selection.len()
        );
        Ok(changed)
    }

    /// Clears the selection and requested additions for reuse.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.additions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::FieldInfo;

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Health(u32);

    impl Component for Health {
        const NAME: &'static str = "Health";
        const FIELDS: &'static [FieldInfo] = &[];
    }

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Armor(u32);

    impl Component for Armor {
        const NAME: &'static str = "Armor";
        const FIELDS: &'static [FieldInfo] = &[];
    }

    fn world() -> World {
        let mut world = World::new();
        world.register_component::<Health>();
        world.register_component::<Armor>();
        world
    }

    #[test]
    fn new_operation_is_empty() {
        let operation = Operation::new();
        assert!(operation.is_empty());
        assert_eq!(operation.len(), 0);
    }

    #[test]
    fn adds_defaults_to_selection_only() {
        let mut world = world();
        let a = world.spawn();
        let b = world.spawn();
        let untouched = world.spawn();

        let mut operation = Operation::new();
        operation.select_many(&[a, b]);
        operation.add_component::<Health>();
        assert_eq!(operation.perform(&mut world), Ok(2));

        assert_eq!(world.get::<Health>(a), Some(&Health(0)));
        assert_eq!(world.get::<Health>(b), Some(&Health(0)));
        assert!(!world.contains::<Health>(untouched));
    }

    #[test]
    fn existing_values_are_kept() {
        let mut world = world();
        let e = world.spawn();
        world.insert(e, Health(50)).unwrap();

        let mut operation = Operation::new();
        operation.select(e);
        operation.add_component::<Health>();
        operation.add_component::<Armor>();
        assert_eq!(operation.perform(&mut world), Ok(1));
        assert_eq!(world.get::<Health>(e), Some(&Health(50)));
        assert_eq!(world.get::<Armor>(e), Some(&Armor(0)));

        // Second run has nothing left to add
        assert_eq!(operation.perform(&mut world), Ok(0));
    }

    #[test]
    fn dead_entity_aborts_whole_batch() {
        let mut world = world();
        let alive = world.spawn();
        let dead = world.spawn();
        world.despawn(dead);

        let mut operation = Operation::new();
        operation.select_many(&[alive, dead]);
        operation.add_component::<Health>();
        assert_eq!(operation.perform(&mut world), Err(EcsError::DeadEntity(dead)));
        assert!(!world.contains::<Health>(alive));
    }

    #[test]
    fn unregistered_type_aborts_whole_batch() {
        let mut world = World::new();
        world.register_component::<Armor>();
        let e = world.spawn();

        let mut operation = Operation::new();
        operation.select(e);
        operation.add_component::<Armor>();
        operation.add_component::<Health>();
        assert_eq!(
            operation.perform(&mut world),
            Err(EcsError::ComponentNotRegistered { type_name: "Health" })
        );
        assert!(!world.contains::<Armor>(e));
    }

    #[test]
    fn reset_clears_state() {
        let mut world = world();
        let e = world.spawn();

        let mut operation = Operation::new();
        operation.select(e);
        operation.add_component::<Health>();
        operation.reset();
        assert!(operation.is_empty());

        operation.select(e);
        assert_eq!(operation.perform(&mut world), Ok(0));
        assert!(!world.contains::<Health>(e));
    }
}
