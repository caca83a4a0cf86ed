//! # Rogue Procedural
//!
//! Chunked spatial storage and on-demand world generation.
//!
//! ## Design Principles
//!
//! 1. **Chunked**: The world is stored in 16x16x4 cell chunks
//! 2. **Lazy**: A chunk is generated the first time anything touches it
//! 3. **Once**: A materialized chunk is never generated again
//! 4. **Deterministic**: Same seed always produces the same world
//!
//! ## Core Components
//!
//! - `EntityMap`: `(x, y, z) -> Entity` with a pluggable `ChunkGenerator`
//! - `SharedEntityMap`: thread-safe variant driven by a `ChunkFiller`
//! - `CaveGenerator`: seeded wall/floor generator implementing both
//!
//! ## Example
//!
//! ```rust,ignore
//! use rogue_core::Entity;
//! use rogue_procedural::{CaveGenerator, ChunkCoord, EntityMap, WorldSeed};
//!
//! let cave = CaveGenerator::new(WorldSeed::new(1), Entity::new(1), Entity::new(2));
//! let mut map = EntityMap::with_generator(cave);
//!
//! let tile = map.get(100, 100, 0);
//! assert!(map.chunk_generated(ChunkCoord::from_cell(100, 100, 0)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cave;
pub mod chunk;
pub mod map;
pub mod seed;
pub mod shared;

pub use cave::CaveGenerator;
pub use chunk::{
    local_coords, local_index, ChunkCoord, ChunkKey, MapChunk, CELLS_PER_CHUNK, CHUNK_DEPTH,
    CHUNK_HEIGHT, CHUNK_WIDTH,
};
pub use map::{ChunkGenerator, ChunkStore, EntityMap};
pub use seed::WorldSeed;
pub use shared::{ChunkFiller, SharedEntityMap};
