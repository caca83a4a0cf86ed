//! # Rogue Base
//!
//! Game-level layer on top of the entity database and the chunked map.
//!
//! ## Components
//!
//! | Name       | Type                                   |
//! |------------|----------------------------------------|
//! | `art`      | [`Art`]                                |
//! | `location` | [`Location`]                           |
//! | `map`      | [`EntityMap`](rogue_procedural::EntityMap) |
//! | `brain`    | [`Brain`]                              |
//!
//! ```rust
//! use rogue_base::{build_cave_region, place, register_types, tile_at, CaveConfig};
//! use rogue_core::EntityDb;
//!
//! let mut db = EntityDb::new();
//! register_types(&mut db);
//!
//! let region = build_cave_region(&mut db, &CaveConfig::default());
//! let hero = db.new_entity(&[]);
//! assert!(place(&mut db, hero, region, 0, 0, 0));
//! assert_eq!(tile_at(&mut db, region, 0, 0, 0), hero);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod behavior;
pub mod components;
pub mod config;
pub mod error;
pub mod region;
pub mod systems;

pub use behavior::{Behavior, Follow, Idle, Step, Wander};
pub use components::{register_types, Art, Brain, Color, Location, ART, BRAIN, LOCATION, MAP};
pub use config::CaveConfig;
pub use error::{ConfigError, ConfigResult};
pub use region::build_cave_region;
pub use systems::{place, think, tile_at};
