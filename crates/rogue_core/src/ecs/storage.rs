//! # Component Storage
//!
//! Typed, sparse component storage for a single component type.
//!
//! - Components are keyed by entity in a `BTreeMap`, so iteration order is
//!   ascending by entity id and stable across repeated calls
//! - Construction and cloning go through the closures supplied at
//!   registration time

use std::any::Any;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use super::component::ComponentManager;
use super::entity::Entity;

/// Zero-argument constructor for a default component.
pub type Factory<T> = Box<dyn Fn() -> T>;

/// Produces an independent copy of a component.
pub type Cloner<T> = Box<dyn Fn(&T) -> T>;

/// Storage for every instance of one component type.
///
/// This is the sole owner of component instances of its type.
///
/// # Example
///
/// ```rust,ignore
/// let mut storage = ComponentStorage::new(|| 0u32, |v: &u32| *v);
/// *storage.create(Entity::new(1)) = 5;
/// assert_eq!(storage.get(Entity::new(1)), Some(&5));
/// ```
pub struct ComponentStorage<T> {
    /// Builds a default instance.
    factory: Factory<T>,
    /// Deep-copies an instance.
    cloner: Cloner<T>,
    /// Entity -> component.
    components: BTreeMap<Entity, T>,
}

impl<T: 'static> ComponentStorage<T> {
    /// Creates empty storage from a factory and a cloner.
    #[must_use]
    pub fn new<F, C>(factory: F, cloner: C) -> Self
    where
        F: Fn() -> T + 'static,
        C: Fn(&T) -> T + 'static,
    {
        Self {
            factory: Box::new(factory),
            cloner: Box::new(cloner),
            components: BTreeMap::new(),
        }
    }

    /// Stores `value` for `eid` and returns a handle to the stored value.
    fn put(&mut self, eid: Entity, value: T) -> &mut T {
        match self.components.entry(eid) {
            btree_map::Entry::Occupied(mut slot) => {
                slot.insert(value);
                slot.into_mut()
            }
            btree_map::Entry::Vacant(slot) => slot.insert(value),
        }
    }

    /// Creates a default component for `eid`, replacing any existing one.
    pub fn create(&mut self, eid: Entity) -> &mut T {
        let value = (self.factory)();
        self.put(eid, value)
    }

    /// Clones `src`'s component into `dst`.
    ///
    /// Returns `None` (and creates nothing) when `src` has no component.
    pub fn clone_into(&mut self, src: Entity, dst: Entity) -> Option<&mut T> {
        let copy = (self.cloner)(self.components.get(&src)?);
        Some(self.put(dst, copy))
    }

    /// Stores a concrete value, returning the value it replaced.
    pub fn insert(&mut self, eid: Entity, value: T) -> Option<T> {
        self.components.insert(eid, value)
    }

    /// Gets `eid`'s component.
    #[inline]
    #[must_use]
    pub fn get(&self, eid: Entity) -> Option<&T> {
        self.components.get(&eid)
    }

    /// Gets `eid`'s component mutably.
    #[inline]
    pub fn get_mut(&mut self, eid: Entity) -> Option<&mut T> {
        self.components.get_mut(&eid)
    }

    /// Removes and returns `eid`'s component.
    pub fn take(&mut self, eid: Entity) -> Option<T> {
        self.components.remove(&eid)
    }

    /// Iterates over `(entity, component)` pairs in ascending entity order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter().map(|(eid, c)| (*eid, c))
    }

    /// Iterates mutably over `(entity, component)` pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.components.iter_mut().map(|(eid, c)| (*eid, c))
    }
}

impl<T> fmt::Debug for ComponentStorage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentStorage")
            .field("type", &std::any::type_name::<T>())
            .field("len", &self.components.len())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> ComponentManager for ComponentStorage<T> {
    fn component_type(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn create(&mut self, eid: Entity) {
        ComponentStorage::create(self, eid);
    }

    fn clone_component(&mut self, src: Entity, dst: Entity) -> bool {
        self.clone_into(src, dst).is_some()
    }

    fn has(&self, eid: Entity) -> bool {
        self.components.contains_key(&eid)
    }

    fn remove(&mut self, eid: Entity) -> bool {
        self.components.remove(&eid).is_some()
    }

    fn entities(&self) -> Vec<Entity> {
        self.components.keys().copied().collect()
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
