//! # Component Managers
//!
//! A component is any `'static` Rust value registered under a string name.
//! The database stores one manager per name behind the object-safe
//! [`ComponentManager`] trait, so lifecycle operations (create, clone,
//! remove, search) run without knowing the concrete type. Typed access goes
//! through a single checked downcast to [`ComponentStorage<T>`].
//!
//! [`ComponentStorage<T>`]: super::storage::ComponentStorage

use std::any::Any;
use std::fmt;

use super::entity::Entity;

/// Type-erased view of a per-type component store.
///
/// Implemented by [`ComponentStorage<T>`](super::storage::ComponentStorage)
/// for every `T: 'static`.
pub trait ComponentManager: Any {
    /// Rust type name of the stored component, for diagnostics.
    fn component_type(&self) -> &'static str;

    /// Creates a default component for `eid`, replacing any existing one.
    fn create(&mut self, eid: Entity);

    /// Clones `src`'s component into `dst`.
    ///
    /// Returns `false` and leaves `dst` untouched when `src` has no
    /// component. Never manufactures a default instance.
    fn clone_component(&mut self, src: Entity, dst: Entity) -> bool;

    /// Checks if `eid` has a component in this store.
    fn has(&self, eid: Entity) -> bool;

    /// Removes `eid`'s component. Returns `false` if there was none.
    fn remove(&mut self, eid: Entity) -> bool;

    /// All entities holding this component, in ascending order.
    fn entities(&self) -> Vec<Entity>;

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Checks if no entity holds this component.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upcast for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Debug for dyn ComponentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManager")
            .field("type", &self.component_type())
            .field("len", &self.len())
            .finish()
    }
}
