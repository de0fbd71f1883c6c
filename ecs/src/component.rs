//! Component reflection, ids and component-set masks.
//!
//! The [`Component`] trait gives every component a static name and a field
//! list. Use `#[derive(Component)]` from [`ecs_macro`] to implement it.
//!
//! Each registered component type gets a dense [`ComponentId`]. The set of
//! components an entity carries is a [`ComponentMask`], which is how the
//! world groups entities into [`EntityGroup`](crate::EntityGroup)s.

use std::hash::{Hash, Hasher};

use fixedbitset::FixedBitSet;

/// Trait for reflected ECS components.
///
/// # Deriving
///
/// ```ignore
/// #[derive(Component)]
/// struct Destination {
///     width: u32,
///     height: u32,
/// }
/// ```
///
/// # Manual implementation
///
/// ```ignore
/// impl Component for Marker {
///     const NAME: &'static str = "Marker";
///     const FIELDS: &'static [FieldInfo] = &[];
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// The struct name as a static string (e.g. `"CameraSettings"`).
    const NAME: &'static str;

    /// Reflected fields, in declaration order. Padding fields are omitted.
    const FIELDS: &'static [FieldInfo];

    /// Returns the struct name.
    fn component_name(&self) -> &'static str {
        Self::NAME
    }
}

/// Metadata describing a single reflected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name (`"0"`, `"1"`, ... for tuple structs).
    pub name: &'static str,
    pub kind: FieldKind,
}

/// The value type of a reflected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    F32,
    U32,
    Bool,
    Vec3,
    Quat,
    Mat4,
    /// A per-entity reference slot ([`RefSlot`](crate::RefSlot)).
    RefSlot,
}

/// Dense identifier assigned to a component type on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) u32);

impl ComponentId {
    /// Returns the bit index of this component inside a [`ComponentMask`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A set of component ids.
///
/// Two masks are equal when they contain the same ids, regardless of how
/// many component types were registered when each mask was built.
#[derive(Clone, Default)]
pub struct ComponentMask(FixedBitSet);

impl ComponentMask {
    pub fn new() -> Self {
        Self(FixedBitSet::new())
    }

    /// Builds a mask from a list of ids.
    pub fn from_ids(ids: impl IntoIterator<Item = ComponentId>) -> Self {
        let mut mask = Self::new();
        for id in ids {
            mask.insert(id);
        }
        mask
    }

    pub fn insert(&mut self, id: ComponentId) {
        if id.index() >= self.0.len() {
            self.0.grow(id.index() + 1);
        }
        self.0.insert(id.index());
    }

    pub fn remove(&mut self, id: ComponentId) {
        if self.0.contains(id.index()) {
            self.0.set(id.index(), false);
        }
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.0.contains(id.index())
    }

    /// Returns `true` if every id in `other` is also in `self`.
    pub fn contains_all(&self, other: &ComponentMask) -> bool {
        other.0.ones().all(|bit| self.0.contains(bit))
    }

    /// Number of ids in the mask.
    pub fn len(&self) -> usize {
        self.0.count_ones(..)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterates over the ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.0.ones().map(|bit| ComponentId(bit as u32))
    }
}

impl PartialEq for ComponentMask {
    fn eq(&self, other: &Self) -> bool {
        self.0.ones().eq(other.0.ones())
    }
}

impl Eq for ComponentMask {}

impl Hash for ComponentMask {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for bit in self.0.ones() {
            bit.hash(state);
        }
    }
}

impl std::fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.ones()).finish()
    }
}
