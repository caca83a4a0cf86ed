//! # World Seeds
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, every generator in this crate produces
//! **exactly** the same chunks on any platform, in any access order.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::chunk::{ChunkCoord, ChunkKey};

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose.
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// RNG stream for one chunk, independent of generation order.
    #[must_use]
    pub fn chunk_rng(self, coord: ChunkCoord) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive(ChunkKey::from(coord).raw()).value())
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}
