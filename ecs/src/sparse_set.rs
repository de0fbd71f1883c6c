use std::any::Any;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Typed sparse set storing components of type T.
///
/// Uses a sparse array (entity index → dense index) and a dense array
/// (contiguous component data + entity mapping) for O(1) insert/remove/get
/// and cache-friendly iteration.
pub struct SparseSetInner<T: 'static> {
    /// Sparse array: `entity_index -> dense_index`. `None` means the entity
    /// does not have this component.
    sparse: Vec<Option<u32>>,
    /// Dense array of component values (contiguous for iteration).
    dense: Vec<T>,
    /// Entity indices corresponding to each dense element.
    entities: Vec<u32>,
}

impl<T: 'static> SparseSetInner<T> {
    /// Creates a new empty sparse set.
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            entities: Vec::new(),
        }
    }

    /// Inserts a component for the given entity index.
    /// If the entity already has this component, the value is replaced.
    pub fn insert(&mut self, entity_index: u32, value: T) {
        let idx = entity_index as usize;

        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }

        if let Some(dense_idx) = self.sparse[idx] {
            self.dense[dense_idx as usize] = value;
        } else {
            let dense_idx = self.dense.len() as u32;
            self.sparse[idx] = Some(dense_idx);
            self.dense.push(value);
            self.entities.push(entity_index);
        }
    }

    /// Removes a component for the given entity index.
    /// Returns the removed value, or `None` if the entity did not have this component.
    pub fn remove(&mut self, entity_index: u32) -> Option<T> {
        let idx = entity_index as usize;
        if idx >= self.sparse.len() {
            return None;
        }

        let dense_idx = self.sparse[idx]? as usize;
        self.sparse[idx] = None;

        let last_dense = self.dense.len() - 1;
        if dense_idx != last_dense {
            // Swap-remove: move last element into the removed slot
            let swapped_entity = self.entities[last_dense];
            self.sparse[swapped_entity as usize] = Some(dense_idx as u32);
            self.entities[dense_idx] = swapped_entity;
        }

        self.entities.pop();
        Some(self.dense.swap_remove(dense_idx))
    }

    /// Returns a reference to the component for the given entity index.
    pub fn get(&self, entity_index: u32) -> Option<&T> {
        let dense_idx = (*self.sparse.get(entity_index as usize)?)? as usize;
        Some(&self.dense[dense_idx])
    }

    /// Returns a mutable reference to the component for the given entity index.
    pub fn get_mut(&mut self, entity_index: u32) -> Option<&mut T> {
        let dense_idx = (*self.sparse.get(entity_index as usize)?)? as usize;
        Some(&mut self.dense[dense_idx])
    }

    /// Returns whether the entity has this component.
    pub fn contains(&self, entity_index: u32) -> bool {
        matches!(self.sparse.get(entity_index as usize), Some(Some(_)))
    }

    /// Returns the number of components stored.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns whether this sparse set is empty.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Iterates over `(entity_index, &component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterates over `(entity_index, &mut component)` pairs in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// Returns a slice of entity indices in dense order.
    pub fn entities(&self) -> &[u32] {
        &self.entities
    }
}

impl<T: 'static> Default for SparseSetInner<T> {
    fn default() -> Self {
        Self::new()
    }
}

type RemoveFn = fn(&mut dyn Any, u32) -> bool;
type ContainsFn = fn(&dyn Any, u32) -> bool;

/// A type-erased sparse set that stores components of a single type.
///
/// Provides per-storage RwLock synchronization for runtime borrow checks.
/// Used internally by [`World`](crate::World).
pub(crate) struct ComponentStorage {
    inner: Box<dyn Any + Send + Sync>,
    lock: RwLock<()>,
    type_name: &'static str,
    remove_fn: RemoveFn,
    contains_fn: ContainsFn,
}

impl ComponentStorage {
    /// Creates a new component storage for type `T`.
    pub fn new<T: Send + Sync + 'static>(type_name: &'static str) -> Self {
        Self {
            inner: Box::new(SparseSetInner::<T>::new()),
            lock: RwLock::new(()),
            type_name,
            remove_fn: |any, entity_index| {
                any.downcast_mut::<SparseSetInner<T>>()
                    .is_some_and(|set| set.remove(entity_index).is_some())
            },
            contains_fn: |any, entity_index| {
                any.downcast_ref::<SparseSetInner<T>>()
                    .is_some_and(|set| set.contains(entity_index))
            },
        }
    }

    /// Downcasts to the typed sparse set.
    ///
    /// Storages are keyed by `TypeId`, so the downcast only fails if the
    /// world registry is corrupted.
    pub fn typed<T: 'static>(&self) -> &SparseSetInner<T> {
        self.inner
            .downcast_ref::<SparseSetInner<T>>()
            .unwrap_or_else(|| panic!("storage type mismatch for `{}`", self.type_name))
    }

    /// Downcasts to the typed sparse set (mutable).
    pub fn typed_mut<T: 'static>(&mut self) -> &mut SparseSetInner<T> {
        let type_name = self.type_name;
        self.inner
            .downcast_mut::<SparseSetInner<T>>()
            .unwrap_or_else(|| panic!("storage type mismatch for `{type_name}`"))
    }

    /// Acquires a shared read lock. Panics immediately if a write lock is held.
    fn lock_read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.try_read().unwrap_or_else(|_| {
            panic!(
                "Cannot borrow `{}` immutably: already borrowed mutably",
                self.type_name
            )
        })
    }

    /// Acquires an exclusive write lock. Panics immediately if any lock is held.
    fn lock_write(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.try_write().unwrap_or_else(|_| {
            panic!(
                "Cannot borrow `{}` mutably: already borrowed",
                self.type_name
            )
        })
    }

    /// Removes a component by entity index (type-erased). Returns true if removed.
    pub fn remove_untyped(&mut self, entity_index: u32) -> bool {
        (self.remove_fn)(self.inner.as_mut(), entity_index)
    }

    /// Checks if the entity has this component (type-erased).
    pub fn contains_untyped(&self, entity_index: u32) -> bool {
        (self.contains_fn)(self.inner.as_ref(), entity_index)
    }
}

/// Shared read access to a component storage.
///
/// Releases the lock when dropped. Dereferences to [`SparseSetInner<T>`].
pub struct Ref<'a, T: 'static> {
    inner: &'a SparseSetInner<T>,
    _guard: RwLockReadGuard<'a, ()>,
}

impl<'a, T: 'static> Ref<'a, T> {
    pub(crate) fn new(storage: &'a ComponentStorage) -> Self {
        let guard = storage.lock_read();
        Self {
            inner: storage.typed::<T>(),
            _guard: guard,
        }
    }
}

impl<T: 'static> Deref for Ref<'_, T> {
    type Target = SparseSetInner<T>;

    fn deref(&self) -> &Self::Target {
        self.inner
    }
}

/// Exclusive write access to a component storage.
///
/// Releases the lock when dropped. Dereferences to [`SparseSetInner<T>`]
/// for lookup and mutation.
pub struct RefMut<'a, T: 'static> {
    inner: *mut SparseSetInner<T>,
    _guard: RwLockWriteGuard<'a, ()>,
    _marker: PhantomData<&'a mut SparseSetInner<T>>,
}

impl<'a, T: 'static> RefMut<'a, T> {
    pub(crate) fn new(storage: &'a ComponentStorage) -> Self {
        let guard = storage.lock_write();
        // SAFETY: lock_write() guarantees exclusive access for the guard's
        // lifetime, so no other reference to the storage exists.
        let inner = storage.typed::<T>() as *const SparseSetInner<T> as *mut SparseSetInner<T>;
        Self {
            inner,
            _guard: guard,
            _marker: PhantomData,
        }
    }
}

impl<T: 'static> Deref for RefMut<'_, T> {
    type Target = SparseSetInner<T>;

    fn deref(&self) -> &Self::Target {
        // SAFETY: exclusive access is guaranteed by the write lock.
        unsafe { &*self.inner }
    }
}

impl<T: 'static> DerefMut for RefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: exclusive access is guaranteed by the write lock.
        unsafe { &mut *self.inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut set = SparseSetInner::new();
        set.insert(5, "five");
        set.insert(2, "two");

        assert_eq!(set.get(5), Some(&"five"));
        assert_eq!(set.get(2), Some(&"two"));
        assert_eq!(set.get(3), None);
        assert_eq!(set.get(100), None);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn insert_replaces() {
        let mut set = SparseSetInner::new();
        set.insert(1, 10);
        set.insert(1, 20);
        assert_eq!(set.get(1), Some(&20));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_swaps_last_into_hole() {
        let mut set = SparseSetInner::new();
        set.insert(0, 'a');
        set.insert(1, 'b');
        set.insert(2, 'c');

        assert_eq!(set.remove(0), Some('a'));
        assert_eq!(set.get(2), Some(&'c'));
        assert_eq!(set.get(1), Some(&'b'));
        assert!(!set.contains(0));
        assert_eq!(set.entities(), &[2, 1]);
        assert_eq!(set.remove(0), None);
    }

    #[test]
    fn iter_mut_modifies() {
        let mut set = SparseSetInner::new();
        set.insert(3, 1);
        set.insert(7, 2);
        for (_, value) in set.iter_mut() {
            *value *= 10;
        }
        let mut values: Vec<_> = set.iter().map(|(idx, v)| (idx, *v)).collect();
        values.sort();
        assert_eq!(values, vec![(3, 10), (7, 20)]);
    }

    #[test]
    fn untyped_ops() {
        let mut storage = ComponentStorage::new::<u32>("u32");
        storage.typed_mut::<u32>().insert(4, 9);
        assert!(storage.contains_untyped(4));
        assert!(storage.remove_untyped(4));
        assert!(!storage.contains_untyped(4));
        assert!(!storage.remove_untyped(4));
    }

    #[test]
    fn shared_reads_coexist() {
        let storage = ComponentStorage::new::<u32>("u32");
        let a = Ref::<u32>::new(&storage);
        let b = Ref::<u32>::new(&storage);
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn write_while_reading_panics() {
        let storage = ComponentStorage::new::<u32>("u32");
        let _read = Ref::<u32>::new(&storage);
        let _write = RefMut::<u32>::new(&storage);
    }
}
