use std::any::TypeId;
use std::collections::HashMap;

use crate::component::{Component, ComponentId, ComponentMask};
use crate::entity::{Entity, EntityAllocator};
use crate::error::{EcsError, EcsResult};
use crate::group::EntityGroup;
use crate::reference::{RefSlot, ReferenceTable, ResolveReference};
use crate::sparse_set::{ComponentStorage, Ref, RefMut};

/// Registry entry for a single component type.
struct ComponentInfo {
    name: &'static str,
    storage: ComponentStorage,
}

/// An independent ECS world containing entities, components and per-entity
/// reference tables.
///
/// Component data lives in one sparse set per registered type. The world
/// also tracks each entity's component set as a [`ComponentMask`], which
/// backs the grouped view returned by [`groups`](World::groups).
///
/// # Example
///
/// ```ignore
/// use vantage_ecs::World;
///
/// let mut world = World::new();
/// world.register_component::<Destination>();
///
/// let target = world.spawn();
/// world.insert(target, Destination::new(800, 600)).unwrap();
///
/// let camera = world.spawn();
/// let slot = world.add_reference(camera, target).unwrap();
/// assert_eq!(world.reference(camera, slot), Some(target));
/// ```
pub struct World {
    entities: EntityAllocator,
    components: Vec<ComponentInfo>,
    component_ids: HashMap<TypeId, ComponentId>,
    /// Component set of every entity slot, indexed by entity index.
    masks: Vec<ComponentMask>,
    references: ReferenceTable,
}

impl World {
    /// Creates a new empty world.
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            components: Vec::new(),
            component_ids: HashMap::new(),
            masks: Vec::new(),
            references: ReferenceTable::new(),
        }
    }

    // ---- Entity management ----

    /// Spawns a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.entities.allocate();
        let idx = entity.index() as usize;
        if idx >= self.masks.len() {
            self.masks.resize_with(idx + 1, ComponentMask::new);
        }
        self.masks[idx].clear();
        entity
    }

    /// Despawns an entity, removing all its components and dropping its
    /// reference table.
    ///
    /// Returns `false` if the entity was already dead. References held by
    /// other entities that point at this one are left in place and fail
    /// liveness checks from now on.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }

        let index = entity.index();
        for info in &mut self.components {
            info.storage.remove_untyped(index);
        }
        self.masks[index as usize].clear();
        self.references.clear(index);
        true
    }

    /// Returns whether the entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the number of alive entities.
    pub fn entity_count(&self) -> u32 {
        self.entities.count()
    }

    /// Highest index held by a live entity, or `None` for an empty world.
    pub fn max_entity_index(&self) -> Option<u32> {
        self.entities.max_alive_index()
    }

    /// Returns the live entity occupying `index`, if any.
    pub fn entity_at_index(&self, index: u32) -> Option<Entity> {
        self.entities.entity_at_index(index)
    }

    /// Iterates over all currently alive entities in index order.
    pub fn iter_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive()
    }

    // ---- Component registry ----

    /// Registers a component type and returns its id.
    ///
    /// Registering an already known type returns the existing id.
    pub fn register_component<T: Component>(&mut self) -> ComponentId {
        let type_id = TypeId::of::<T>();
        if let Some(&id) = self.component_ids.get(&type_id) {
            return id;
        }

        let id = ComponentId(self.components.len() as u32);
        self.components.push(ComponentInfo {
            name: T::NAME,
            storage: ComponentStorage::new::<T>(T::NAME),
        });
        self.component_ids.insert(type_id, id);
        log::trace!("registered component {} as {:?}", T::NAME, id);
        id
    }

    /// Returns the id of a registered component type.
    pub fn component_id<T: 'static>(&self) -> Option<ComponentId> {
        self.component_id_by_type(TypeId::of::<T>())
    }

    pub(crate) fn component_id_by_type(&self, type_id: TypeId) -> Option<ComponentId> {
        self.component_ids.get(&type_id).copied()
    }

    /// Returns the name of a registered component.
    pub fn component_name(&self, id: ComponentId) -> Option<&'static str> {
        self.components.get(id.index()).map(|info| info.name)
    }

    /// Number of registered component types.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Returns the component set of a live entity.
    pub fn entity_mask(&self, entity: Entity) -> Option<&ComponentMask> {
        if !self.is_alive(entity) {
            return None;
        }
        self.masks.get(entity.index() as usize)
    }

    /// Names of every component on a live entity, in id order.
    pub fn component_names(&self, entity: Entity) -> Vec<&'static str> {
        self.entity_mask(entity)
            .map(|mask| {
                mask.iter()
                    .filter_map(|id| self.component_name(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn storage<T: 'static>(&self) -> EcsResult<&ComponentStorage> {
        self.component_id::<T>()
            .map(|id| &self.components[id.index()].storage)
            .ok_or(EcsError::ComponentNotRegistered {
                type_name: std::any::type_name::<T>(),
            })
    }

    // ---- Component management (structural changes, require &mut self) ----

    /// Inserts a component on an entity.
    ///
    /// If the entity already has this component, the value is replaced.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DeadEntity`] if the entity is not alive.
    /// - [`EcsError::ComponentNotRegistered`] if `T` was never registered.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::DeadEntity(entity));
        }
        let id = self
            .component_id::<T>()
            .ok_or(EcsError::ComponentNotRegistered {
                type_name: std::any::type_name::<T>(),
            })?;

        self.components[id.index()]
            .storage
            .typed_mut::<T>()
            .insert(entity.index(), component);
        self.masks[entity.index() as usize].insert(id);
        Ok(())
    }

    /// Removes a component from an entity, returning it.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        let id = self.component_id::<T>()?;
        let removed = self.components[id.index()]
            .storage
            .typed_mut::<T>()
            .remove(entity.index());
        if removed.is_some() {
            self.masks[entity.index() as usize].remove(id);
        }
        removed
    }

    /// Returns a reference to a component on a live entity.
    pub fn get<T: 'static>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.storage::<T>().ok()?.typed::<T>().get(entity.index())
    }

    /// Returns a mutable reference to a component on a live entity.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        let id = self.component_id::<T>()?;
        self.components[id.index()]
            .storage
            .typed_mut::<T>()
            .get_mut(entity.index())
    }

    /// Returns a copy of a component, or `default` if the entity does not
    /// have it (or is dead, or the type is unregistered).
    pub fn get_or<T: Copy + 'static>(&self, entity: Entity, default: T) -> T {
        self.get::<T>(entity).copied().unwrap_or(default)
    }

    /// Returns whether a live entity has component `T`.
    pub fn contains<T: 'static>(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
            && self
                .storage::<T>()
                .is_ok_and(|storage| storage.contains_untyped(entity.index()))
    }

    // ---- Query access (runtime borrow-checked, take &self) ----

    /// Gets shared read access to all components of type T.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] if `T` has never been registered.
    ///
    /// # Panics
    ///
    /// Panics if T is exclusively borrowed by a [`write`](World::write) call.
    pub fn read<T: 'static>(&self) -> EcsResult<Ref<'_, T>> {
        Ok(Ref::new(self.storage::<T>()?))
    }

    /// Gets exclusive write access to all components of type T.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentNotRegistered`] if `T` has never been registered.
    ///
    /// # Panics
    ///
    /// Panics if T is already borrowed.
    pub fn write<T: 'static>(&self) -> EcsResult<RefMut<'_, T>> {
        Ok(RefMut::new(self.storage::<T>()?))
    }

    // ---- Grouped views ----

    /// Groups all live entities by their exact component set.
    ///
    /// Groups appear in the order their first entity is found when walking
    /// entities by ascending index, so iteration order is deterministic.
    pub fn groups(&self) -> Vec<EntityGroup> {
        let mut groups: Vec<EntityGroup> = Vec::new();
        let mut lookup: HashMap<ComponentMask, usize> = HashMap::new();

        for entity in self.entities.iter_alive() {
            let mask = &self.masks[entity.index() as usize];
            let slot = match lookup.get(mask) {
                Some(&slot) => slot,
                None => {
                    let slot = groups.len();
                    groups.push(EntityGroup::new(mask.clone()));
                    lookup.insert(mask.clone(), slot);
                    slot
                }
            };
            groups[slot].push(entity);
        }
        groups
    }

    // ---- References ----

    /// Stores a reference from `owner` to `target` and returns the slot.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DeadEntity`] if either entity is not alive.
    pub fn add_reference(&mut self, owner: Entity, target: Entity) -> EcsResult<RefSlot> {
        for entity in [owner, target] {
            if !self.is_alive(entity) {
                return Err(EcsError::DeadEntity(entity));
            }
        }
        Ok(self.references.push(owner.index(), target))
    }

    /// Points an existing slot of `owner` at a new target.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DeadEntity`] if either entity is not alive.
    /// - [`EcsError::UnknownReference`] if the slot was never added.
    pub fn set_reference(&mut self, owner: Entity, slot: RefSlot, target: Entity) -> EcsResult<()> {
        for entity in [owner, target] {
            if !self.is_alive(entity) {
                return Err(EcsError::DeadEntity(entity));
            }
        }
        if self.references.set(owner.index(), slot, target) {
            Ok(())
        } else {
            Err(EcsError::UnknownReference { owner, slot })
        }
    }

    /// Returns the entity stored in `owner`'s slot, without a liveness check
    /// on the target.
    pub fn reference(&self, owner: Entity, slot: RefSlot) -> Option<Entity> {
        if !self.is_alive(owner) {
            return None;
        }
        self.references.get(owner.index(), slot)
    }

    /// Number of references stored by `owner`.
    pub fn reference_count(&self, owner: Entity) -> usize {
        if !self.is_alive(owner) {
            return 0;
        }
        self.references.len(owner.index())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveReference for World {
    fn resolve_reference(&self, owner: Entity, slot: RefSlot) -> Option<Entity> {
        self.reference(owner, slot)
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.is_alive(entity)
    }
}
