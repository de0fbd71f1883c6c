//! Per-entity reference slots.
//!
//! Components never store another [`Entity`] directly. Instead an owner
//! entity keeps a small table of referenced entities, and components store a
//! [`RefSlot`] pointing into that table. Resolving a slot goes through the
//! world (or any [`ResolveReference`] implementation), and the result may be
//! stale: the referenced entity can have been despawned since the slot was
//! written.

use crate::entity::Entity;

/// A 1-based index into an entity's reference table.
///
/// [`RefSlot::NULL`] is the unset value and never resolves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct RefSlot(u32);

impl RefSlot {
    /// The unset slot.
    pub const NULL: Self = Self(0);

    /// Creates a slot from its raw 1-based value. `0` yields [`RefSlot::NULL`].
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw 1-based value (`0` for null).
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for the unset slot.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for RefSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Capability to turn `(owner, slot)` into a live entity.
///
/// Implemented by [`World`](crate::World). Systems that only need to follow
/// references take `&impl ResolveReference` so they can be tested against a
/// lightweight resolver.
pub trait ResolveReference {
    /// Returns the entity stored in `owner`'s table at `slot`, without
    /// checking whether it is still alive. `None` for null or unknown slots.
    fn resolve_reference(&self, owner: Entity, slot: RefSlot) -> Option<Entity>;

    /// Returns whether `entity` is currently alive.
    fn contains_entity(&self, entity: Entity) -> bool;
}

/// Reference tables for all entities, indexed by owner entity index.
#[derive(Default)]
pub(crate) struct ReferenceTable {
    tables: Vec<Vec<Entity>>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `target` to `owner_index`'s table and returns its slot.
    pub fn push(&mut self, owner_index: u32, target: Entity) -> RefSlot {
        let idx = owner_index as usize;
        if idx >= self.tables.len() {
            self.tables.resize_with(idx + 1, Vec::new);
        }
        let table = &mut self.tables[idx];
        table.push(target);
        RefSlot(table.len() as u32)
    }

    /// Overwrites an existing slot. Returns `false` if the slot does not exist.
    pub fn set(&mut self, owner_index: u32, slot: RefSlot, target: Entity) -> bool {
        match self.slot_mut(owner_index, slot) {
            Some(entry) => {
                *entry = target;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, owner_index: u32, slot: RefSlot) -> Option<Entity> {
        if slot.is_null() {
            return None;
        }
        self.tables
            .get(owner_index as usize)?
            .get(slot.0 as usize - 1)
            .copied()
    }

    pub fn len(&self, owner_index: u32) -> usize {
        self.tables.get(owner_index as usize).map_or(0, Vec::len)
    }

    /// Drops every reference owned by `owner_index`.
    pub fn clear(&mut self, owner_index: u32) {
        if let Some(table) = self.tables.get_mut(owner_index as usize) {
            table.clear();
        }
    }

    fn slot_mut(&mut self, owner_index: u32, slot: RefSlot) -> Option<&mut Entity> {
        if slot.is_null() {
            return None;
        }
        self.tables
            .get_mut(owner_index as usize)?
            .get_mut(slot.0 as usize - 1)
    }
}
