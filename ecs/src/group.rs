use crate::component::{ComponentId, ComponentMask};
use crate::entity::Entity;

/// A grouped component view: all live entities sharing one exact component set.
///
/// Produced by [`World::groups`](crate::World::groups). Groups are a snapshot
/// of the world's shape at the time of the call; after a structural change
/// the caller must fetch them again.
#[derive(Debug, Clone)]
pub struct EntityGroup {
    mask: ComponentMask,
    entities: Vec<Entity>,
}

impl EntityGroup {
    pub(crate) fn new(mask: ComponentMask) -> Self {
        Self {
            mask,
            entities: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// The component set shared by every entity in the group.
    pub fn mask(&self) -> &ComponentMask {
        &self.mask
    }

    /// Entities in ascending index order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns `true` if the group's component set contains `id`.
    pub fn contains(&self, id: ComponentId) -> bool {
        self.mask.contains(id)
    }

    /// Returns `true` if the group's component set is a superset of `required`.
    pub fn contains_all(&self, required: &ComponentMask) -> bool {
        self.mask.contains_all(required)
    }
}
