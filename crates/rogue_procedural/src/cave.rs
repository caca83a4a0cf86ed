//! # Cave Generation
//!
//! Fills chunks with a random scatter of wall and floor tiles.
//!
//! Tiles are shared: every wall cell holds the same wall entity and every
//! floor cell the same floor entity, so a whole cave costs two entities.
//! Each chunk draws from its own RNG stream derived from the world seed and
//! the chunk key, so the result does not depend on the order chunks are
//! visited.

use rand::Rng;
use rogue_core::Entity;

use crate::chunk::{ChunkCoord, MapChunk};
use crate::map::{ChunkGenerator, ChunkStore};
use crate::seed::WorldSeed;
use crate::shared::ChunkFiller;

/// Seeded wall/floor generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaveGenerator {
    seed: WorldSeed,
    wall: Entity,
    floor: Entity,
    wall_chance: f64,
}

impl CaveGenerator {
    /// Default probability that a cell is a wall.
    pub const DEFAULT_WALL_CHANCE: f64 = 0.1;

    /// Creates a generator placing the given shared tile entities.
    #[must_use]
    pub const fn new(seed: WorldSeed, wall: Entity, floor: Entity) -> Self {
        Self {
            seed,
            wall,
            floor,
            wall_chance: Self::DEFAULT_WALL_CHANCE,
        }
    }

    /// Sets the wall probability, clamped to `0.0..=1.0` (NaN becomes 0).
    #[must_use]
    pub fn with_wall_chance(mut self, chance: f64) -> Self {
        self.wall_chance = if chance.is_nan() {
            0.0
        } else {
            chance.clamp(0.0, 1.0)
        };
        self
    }

    /// The wall probability.
    #[must_use]
    pub const fn wall_chance(&self) -> f64 {
        self.wall_chance
    }

    /// The shared wall tile.
    #[must_use]
    pub const fn wall(&self) -> Entity {
        self.wall
    }

    /// The shared floor tile.
    #[must_use]
    pub const fn floor(&self) -> Entity {
        self.floor
    }

    /// Writes every cell of `chunk` for the chunk at `coord`.
    pub fn fill(&self, coord: ChunkCoord, chunk: &mut MapChunk) {
        let mut rng = self.seed.chunk_rng(coord);
        for cell in chunk.cells_mut() {
            *cell = if rng.gen_bool(self.wall_chance) {
                self.wall
            } else {
                self.floor
            };
        }
    }
}

impl ChunkGenerator for CaveGenerator {
    fn generate_chunk(&mut self, chunks: &mut ChunkStore, coord: ChunkCoord) {
        self.fill(coord, chunks.create_chunk(coord));
    }

    fn box_clone(&self) -> Box<dyn ChunkGenerator> {
        Box::new(*self)
    }
}

impl ChunkFiller for CaveGenerator {
    fn fill_chunk(&self, coord: ChunkCoord, chunk: &mut MapChunk) {
        self.fill(coord, chunk);
    }
}
