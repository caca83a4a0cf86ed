//! # Rogue Core
//!
//! The entity runtime behind the Rogue simulation:
//! - Entities with a reserved "no entity" sentinel
//! - Heterogeneous components registered by name with factory/clone closures
//! - Template instancing and multi-component search
//!
//! ## Example
//!
//! ```rust,ignore
//! use rogue_core::EntityDb;
//!
//! let mut db = EntityDb::new();
//! db.register_default::<u32>("hp");
//! db.register_default::<String>("name");
//!
//! let orc = db.new_entity(&["hp", "name"]);
//! let clone = db.instance(orc);
//! assert_eq!(db.search(&["hp", "name"]), vec![orc, clone]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;

pub use ecs::{
    Cloner, ComponentManager, ComponentStorage, Entity, EntityAllocator, EntityDb, Factory,
};
pub use error::{EcsError, EcsResult};
