//! # Chunk Addressing
//!
//! The world is divided into fixed-size chunks of 16x16x4 cells
//! (x by y by z). A cell coordinate splits into:
//!
//! ```text
//! x: [ chunk-x (high bits) | local-x (4 bits) ]
//! y: [ chunk-y (high bits) | local-y (4 bits) ]
//! z: [ chunk-z (high bits) | local-z (2 bits) ]
//! ```
//!
//! The local bits form a cell index inside one chunk:
//! `local-x << 6 | local-y << 2 | local-z`, a bijection onto `0..1024`.
//!
//! The chunk coordinate is the arithmetic shift of the cell coordinate, so
//! negative cells floor into negative chunks. A [`ChunkKey`] packs the low
//! 20 bits of each chunk axis into one `u64`:
//!
//! ```text
//! bits 40..60: chunk-x   bits 20..40: chunk-y   bits 0..20: chunk-z
//! ```
//!
//! Keys are injective for chunk coordinates in `[-2^19, 2^19)` per axis,
//! i.e. cell x/y within +/- 8 million and cell z within +/- 2 million.
//! [`ChunkCoord::key`] returns `None` outside that range in every build
//! profile, so far-away cells are rejected rather than aliased.

use std::fmt;

use rogue_core::Entity;

/// Local x bits per chunk.
pub const LOCAL_X_BITS: u32 = 4;

/// Local y bits per chunk.
pub const LOCAL_Y_BITS: u32 = 4;

/// Local z bits per chunk.
pub const LOCAL_Z_BITS: u32 = 2;

/// Chunk width (x) in cells.
pub const CHUNK_WIDTH: usize = 1 << LOCAL_X_BITS;

/// Chunk depth (y) in cells.
pub const CHUNK_DEPTH: usize = 1 << LOCAL_Y_BITS;

/// Chunk height (z) in cells.
pub const CHUNK_HEIGHT: usize = 1 << LOCAL_Z_BITS;

/// Total cells per chunk.
pub const CELLS_PER_CHUNK: usize = CHUNK_WIDTH * CHUNK_DEPTH * CHUNK_HEIGHT;

/// Bits per chunk axis inside a [`ChunkKey`].
pub const CHUNK_AXIS_BITS: u32 = 20;

const CHUNK_AXIS_MASK: u64 = (1 << CHUNK_AXIS_BITS) - 1;

/// Smallest chunk coordinate a key can address without colliding.
pub const CHUNK_AXIS_MIN: i64 = -(1 << (CHUNK_AXIS_BITS - 1));

/// Largest chunk coordinate a key can address without colliding.
pub const CHUNK_AXIS_MAX: i64 = (1 << (CHUNK_AXIS_BITS - 1)) - 1;

/// Index of a cell inside its chunk.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn local_index(x: i64, y: i64, z: i64) -> usize {
    let lx = (x & (CHUNK_WIDTH as i64 - 1)) as usize;
    let ly = (y & (CHUNK_DEPTH as i64 - 1)) as usize;
    let lz = (z & (CHUNK_HEIGHT as i64 - 1)) as usize;
    (lx << (LOCAL_Y_BITS + LOCAL_Z_BITS)) | (ly << LOCAL_Z_BITS) | lz
}

/// Splits a local cell index back into `(lx, ly, lz)`.
#[inline]
#[must_use]
pub const fn local_coords(index: usize) -> (usize, usize, usize) {
    (
        (index >> (LOCAL_Y_BITS + LOCAL_Z_BITS)) & (CHUNK_WIDTH - 1),
        (index >> LOCAL_Z_BITS) & (CHUNK_DEPTH - 1),
        index & (CHUNK_HEIGHT - 1),
    )
}

/// Chunk coordinate (in chunks, not cells).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    /// X coordinate in chunks.
    pub x: i64,
    /// Y coordinate in chunks.
    pub y: i64,
    /// Z coordinate in chunks.
    pub z: i64,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// The chunk containing cell `(x, y, z)`.
    #[inline]
    #[must_use]
    pub const fn from_cell(x: i64, y: i64, z: i64) -> Self {
        Self {
            x: x >> LOCAL_X_BITS,
            y: y >> LOCAL_Y_BITS,
            z: z >> LOCAL_Z_BITS,
        }
    }

    /// Cell coordinate of this chunk's lowest corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> (i64, i64, i64) {
        (
            self.x << LOCAL_X_BITS,
            self.y << LOCAL_Y_BITS,
            self.z << LOCAL_Z_BITS,
        )
    }

    /// Checks if cell `(x, y, z)` lies in this chunk.
    #[inline]
    #[must_use]
    pub const fn contains(self, x: i64, y: i64, z: i64) -> bool {
        let c = Self::from_cell(x, y, z);
        c.x == self.x && c.y == self.y && c.z == self.z
    }

    /// Checks if every axis fits the key's collision-free range.
    #[inline]
    #[must_use]
    pub const fn is_addressable(self) -> bool {
        self.x >= CHUNK_AXIS_MIN
            && self.x <= CHUNK_AXIS_MAX
            && self.y >= CHUNK_AXIS_MIN
            && self.y <= CHUNK_AXIS_MAX
            && self.z >= CHUNK_AXIS_MIN
            && self.z <= CHUNK_AXIS_MAX
    }

    /// Packs this coordinate into a map key, or `None` if it is outside
    /// the key range.
    #[inline]
    #[must_use]
    pub fn key(self) -> Option<ChunkKey> {
        if self.is_addressable() {
            Some(ChunkKey::from(self))
        } else {
            None
        }
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Bit-packed chunk coordinate.
///
/// `From<ChunkCoord>` keeps only the low bits of each axis and so aliases
/// coordinates outside the key range; map lookups go through
/// [`ChunkCoord::key`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkKey(u64);

impl ChunkKey {
    /// Returns the packed value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Unpacks the chunk coordinate, sign-extending each axis.
    #[inline]
    #[must_use]
    pub const fn coord(self) -> ChunkCoord {
        ChunkCoord {
            x: sign_extend(self.0 >> (2 * CHUNK_AXIS_BITS)),
            y: sign_extend(self.0 >> CHUNK_AXIS_BITS),
            z: sign_extend(self.0),
        }
    }
}

impl From<ChunkCoord> for ChunkKey {
    #[allow(clippy::cast_sign_loss)]
    fn from(c: ChunkCoord) -> Self {
        Self(
            ((c.x as u64 & CHUNK_AXIS_MASK) << (2 * CHUNK_AXIS_BITS))
                | ((c.y as u64 & CHUNK_AXIS_MASK) << CHUNK_AXIS_BITS)
                | (c.z as u64 & CHUNK_AXIS_MASK),
        )
    }
}

#[inline]
#[allow(clippy::cast_possible_wrap)]
const fn sign_extend(field: u64) -> i64 {
    let shift = 64 - CHUNK_AXIS_BITS;
    (((field & CHUNK_AXIS_MASK) << shift) as i64) >> shift
}

/// One materialized chunk: an entity per cell.
///
/// Cells start as [`Entity::NONE`].
#[derive(Clone, PartialEq, Eq)]
pub struct MapChunk {
    /// `CELLS_PER_CHUNK` cells, indexed by [`local_index`].
    cells: Box<[Entity]>,
}

impl MapChunk {
    /// Creates a chunk with every cell empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![Entity::NONE; CELLS_PER_CHUNK].into_boxed_slice(),
        }
    }

    /// Gets the entity at a local index (see [`local_index`]).
    ///
    /// Out-of-range indices read as empty.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Entity {
        self.cells.get(index).copied().unwrap_or(Entity::NONE)
    }

    /// Sets the entity at a local index. Out-of-range indices are ignored.
    #[inline]
    pub fn set(&mut self, index: usize, eid: Entity) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = eid;
        }
    }

    /// Gets the entity at local coordinates.
    #[inline]
    #[must_use]
    pub fn get_local(&self, lx: usize, ly: usize, lz: usize) -> Entity {
        if lx < CHUNK_WIDTH && ly < CHUNK_DEPTH && lz < CHUNK_HEIGHT {
            self.get((lx << (LOCAL_Y_BITS + LOCAL_Z_BITS)) | (ly << LOCAL_Z_BITS) | lz)
        } else {
            Entity::NONE
        }
    }

    /// Sets the entity at local coordinates.
    #[inline]
    pub fn set_local(&mut self, lx: usize, ly: usize, lz: usize, eid: Entity) {
        if lx < CHUNK_WIDTH && ly < CHUNK_DEPTH && lz < CHUNK_HEIGHT {
            self.set((lx << (LOCAL_Y_BITS + LOCAL_Z_BITS)) | (ly << LOCAL_Z_BITS) | lz, eid);
        }
    }

    /// Sets every cell to `eid`.
    pub fn fill(&mut self, eid: Entity) {
        self.cells.fill(eid);
    }

    /// All cells, indexed by [`local_index`].
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Entity] {
        &self.cells
    }

    /// All cells, mutably.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Entity] {
        &mut self.cells
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|eid| eid.is_some()).count()
    }

    /// Checks if every cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|eid| eid.is_none())
    }
}

impl Default for MapChunk {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MapChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapChunk")
            .field("occupied", &self.occupied())
            .finish()
    }
}
