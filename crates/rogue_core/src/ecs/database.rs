//! # Entity Database
//!
//! The central registry: owns the entity id allocator and one
//! [`ComponentManager`] per registered component name.
//!
//! Component names are wiring between modules. Using a name that was never
//! registered (or registering one twice, or reading it back as the wrong Rust
//! type) panics immediately instead of quietly returning empty data, because
//! `search` results are only correct when every manager is present.
//! A component that is simply missing from an entity is `None`, never a panic.

use std::any::type_name;
use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::component::ComponentManager;
use super::entity::{Entity, EntityAllocator};
use super::storage::ComponentStorage;
use crate::error::{EcsError, EcsResult};

/// Panics with a configuration error.
#[cold]
#[track_caller]
fn fail(err: &EcsError) -> ! {
    panic!("EntityDb: {err}")
}

/// Entity lifecycle, component access, and queries.
///
/// # Example
///
/// ```rust,ignore
/// let mut db = EntityDb::new();
/// db.register("counter", || 0u32, |v: &u32| *v);
///
/// let e1 = db.new_entity(&["counter"]);
/// *db.get_mut::<u32>(e1, "counter").unwrap() = 5;
///
/// let e2 = db.instance(e1);
/// assert_eq!(db.get::<u32>(e2, "counter"), Some(&5));
/// ```
#[derive(Debug, Default)]
pub struct EntityDb {
    /// Issues fresh ids, never reused.
    ids: EntityAllocator,
    /// Component name -> manager.
    managers: BTreeMap<String, Box<dyn ComponentManager>>,
}

impl EntityDb {
    /// Creates an empty database. The first entity will be `#1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a component type under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DuplicateComponent`] if `name` is taken.
    pub fn try_register<T, F, C>(&mut self, name: &str, factory: F, cloner: C) -> EcsResult<()>
    where
        T: 'static,
        F: Fn() -> T + 'static,
        C: Fn(&T) -> T + 'static,
    {
        if self.managers.contains_key(name) {
            return Err(EcsError::DuplicateComponent(name.to_owned()));
        }
        self.managers.insert(
            name.to_owned(),
            Box::new(ComponentStorage::new(factory, cloner)),
        );
        debug!(component = name, rust_type = type_name::<T>(), "registered component");
        Ok(())
    }

    /// Registers a component type under `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    #[track_caller]
    pub fn register<T, F, C>(&mut self, name: &str, factory: F, cloner: C)
    where
        T: 'static,
        F: Fn() -> T + 'static,
        C: Fn(&T) -> T + 'static,
    {
        if let Err(err) = self.try_register(name, factory, cloner) {
            fail(&err);
        }
    }

    /// Registers a component type using its `Default` and `Clone` impls.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered.
    #[track_caller]
    pub fn register_default<T: Default + Clone + 'static>(&mut self, name: &str) {
        self.register(name, T::default, T::clone);
    }

    /// Checks if `name` has a manager.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.managers.contains_key(name)
    }

    /// Registered component names, sorted.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.managers.keys().map(String::as_str)
    }

    /// Number of entity ids issued so far (deleted entities included).
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.ids.issued()
    }

    // =========================================================================
    // Manager lookup
    // =========================================================================

    /// Looks up the manager for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownComponent`] if `name` is not registered.
    pub fn manager(&self, name: &str) -> EcsResult<&dyn ComponentManager> {
        self.managers
            .get(name)
            .map(|manager| &**manager)
            .ok_or_else(|| EcsError::UnknownComponent(name.to_owned()))
    }

    #[track_caller]
    fn manager_or_fail(&self, name: &str) -> &dyn ComponentManager {
        self.manager(name).unwrap_or_else(|err| fail(&err))
    }

    #[track_caller]
    fn manager_mut_or_fail(&mut self, name: &str) -> &mut dyn ComponentManager {
        match self.managers.get_mut(name) {
            Some(manager) => manager.as_mut(),
            None => fail(&EcsError::UnknownComponent(name.to_owned())),
        }
    }

    /// Typed view of the storage for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownComponent`] if `name` is not registered, or
    /// [`EcsError::TypeMismatch`] if it was registered with another type.
    pub fn storage<T: 'static>(&self, name: &str) -> EcsResult<&ComponentStorage<T>> {
        let manager = self.manager(name)?;
        manager
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
            .ok_or_else(|| EcsError::TypeMismatch {
                name: name.to_owned(),
                registered: manager.component_type(),
                requested: type_name::<T>(),
            })
    }

    /// Mutable typed view of the storage for `name`.
    ///
    /// # Errors
    ///
    /// Same as [`storage`](Self::storage).
    pub fn storage_mut<T: 'static>(&mut self, name: &str) -> EcsResult<&mut ComponentStorage<T>> {
        let manager = self
            .managers
            .get_mut(name)
            .ok_or_else(|| EcsError::UnknownComponent(name.to_owned()))?;
        let registered = manager.component_type();
        manager
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .ok_or_else(|| EcsError::TypeMismatch {
                name: name.to_owned(),
                registered,
                requested: type_name::<T>(),
            })
    }

    #[track_caller]
    fn storage_or_fail<T: 'static>(&self, name: &str) -> &ComponentStorage<T> {
        self.storage(name).unwrap_or_else(|err| fail(&err))
    }

    #[track_caller]
    fn storage_mut_or_fail<T: 'static>(&mut self, name: &str) -> &mut ComponentStorage<T> {
        self.storage_mut(name).unwrap_or_else(|err| fail(&err))
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates a new entity with a default instance of each named component.
    ///
    /// Every name is checked before an id is allocated.
    ///
    /// # Panics
    ///
    /// Panics if any name is not registered.
    #[track_caller]
    pub fn new_entity(&mut self, components: &[&str]) -> Entity {
        for name in components {
            self.manager_or_fail(name);
        }

        let eid = self.ids.allocate();
        for name in components {
            self.manager_mut_or_fail(name).create(eid);
        }
        trace!(entity = %eid, ?components, "created entity");
        eid
    }

    /// Creates a new entity by cloning every component `template` has.
    ///
    /// Every registered manager is visited, so component types added after
    /// the template was built are picked up too. Types the template lacks
    /// stay absent.
    pub fn instance(&mut self, template: Entity) -> Entity {
        let eid = self.ids.allocate();
        let mut cloned = 0usize;
        for manager in self.managers.values_mut() {
            if manager.clone_component(template, eid) {
                cloned += 1;
            }
        }
        trace!(entity = %eid, template = %template, cloned, "instanced entity");
        eid
    }

    /// Removes `eid` from every manager. Deleting twice is a no-op.
    pub fn delete(&mut self, eid: Entity) {
        for manager in self.managers.values_mut() {
            manager.remove(eid);
        }
    }

    // =========================================================================
    // Component access
    // =========================================================================

    /// Creates (or resets) a default component on `eid` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered as `T`.
    #[track_caller]
    pub fn create<T: 'static>(&mut self, eid: Entity, name: &str) -> &mut T {
        self.storage_mut_or_fail::<T>(name).create(eid)
    }

    /// Stores `value` as `eid`'s `name` component, returning the old value.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered as `T`.
    #[track_caller]
    pub fn insert<T: 'static>(&mut self, eid: Entity, name: &str, value: T) -> Option<T> {
        self.storage_mut_or_fail::<T>(name).insert(eid, value)
    }

    /// Gets `eid`'s `name` component, or `None` if it has none.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered as `T`.
    #[track_caller]
    #[must_use]
    pub fn get<T: 'static>(&self, eid: Entity, name: &str) -> Option<&T> {
        self.storage_or_fail::<T>(name).get(eid)
    }

    /// Gets `eid`'s `name` component mutably, or `None` if it has none.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered as `T`.
    #[track_caller]
    pub fn get_mut<T: 'static>(&mut self, eid: Entity, name: &str) -> Option<&mut T> {
        self.storage_mut_or_fail::<T>(name).get_mut(eid)
    }

    /// Non-panicking [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not registered as `T`.
    pub fn try_get<T: 'static>(&self, eid: Entity, name: &str) -> EcsResult<Option<&T>> {
        Ok(self.storage::<T>(name)?.get(eid))
    }

    /// Non-panicking [`get_mut`](Self::get_mut).
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not registered as `T`.
    pub fn try_get_mut<T: 'static>(&mut self, eid: Entity, name: &str) -> EcsResult<Option<&mut T>> {
        Ok(self.storage_mut::<T>(name)?.get_mut(eid))
    }

    /// Removes and returns `eid`'s `name` component.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered as `T`.
    #[track_caller]
    pub fn take<T: 'static>(&mut self, eid: Entity, name: &str) -> Option<T> {
        self.storage_mut_or_fail::<T>(name).take(eid)
    }

    /// Removes `eid`'s `name` component. No-op if absent.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not registered.
    #[track_caller]
    pub fn remove(&mut self, eid: Entity, name: &str) {
        self.manager_mut_or_fail(name).remove(eid);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Checks if `eid` has every named component. An empty list is `true`.
    ///
    /// # Panics
    ///
    /// Panics if any name is not registered.
    #[track_caller]
    #[must_use]
    pub fn has(&self, eid: Entity, components: &[&str]) -> bool {
        components
            .iter()
            .all(|name| self.manager_or_fail(name).has(eid))
    }

    /// Returns every entity that has all named components, ascending.
    ///
    /// Candidates come from the smallest named manager and are filtered
    /// against the rest. An empty list matches nothing.
    ///
    /// # Panics
    ///
    /// Panics if any name is not registered.
    #[track_caller]
    #[must_use]
    pub fn search(&self, components: &[&str]) -> Vec<Entity> {
        let Some(seed) = components
            .iter()
            .map(|name| self.manager_or_fail(name))
            .min_by_key(|manager| manager.len())
        else {
            return Vec::new();
        };

        seed.entities()
            .into_iter()
            .filter(|eid| self.has(*eid, components))
            .collect()
    }

    /// Names of every component `eid` has, sorted.
    #[must_use]
    pub fn components_of(&self, eid: Entity) -> Vec<&str> {
        self.managers
            .iter()
            .filter(|(_, manager)| manager.has(eid))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
