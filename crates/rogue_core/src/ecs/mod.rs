//! # Entity Component System
//!
//! A small, name-keyed entity/component runtime.
//!
//! ## Design Philosophy
//!
//! - Entities are plain ids from a monotonic counter, never reused
//! - Each component name owns one type-erased manager
//! - Typed access happens through one checked downcast per call
//! - Wiring mistakes panic, missing components are `None`

mod component;
mod database;
mod entity;
mod storage;

pub use component::ComponentManager;
pub use database::EntityDb;
pub use entity::{Entity, EntityAllocator};
pub use storage::{Cloner, ComponentStorage, Factory};
