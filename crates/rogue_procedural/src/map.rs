//! # Entity Map
//!
//! A sparse, chunked `(x, y, z) -> Entity` map.
//!
//! ## Lazy Generation
//!
//! ```text
//! get/set(x, y, z)
//!   └─ chunk materialized? ── yes ──> read/write cell
//!        └─ no: generator attached?
//!             ├─ yes: generate_chunk(&mut ChunkStore, coord)
//!             │        └─ generator calls create_chunk(coord), fills cells
//!             └─ no:  get -> Entity::NONE, set -> blank chunk
//! ```
//!
//! The generator only ever sees the [`ChunkStore`], whose reads and writes
//! never trigger generation, so a generator cannot recurse into itself.
//!
//! ## Database Access
//!
//! A map usually lives inside the [`EntityDb`] as a component. To let a
//! generator create tile entities on a miss, detach the map from the
//! database and go through [`EntityMap::get_with`] / [`EntityMap::set_with`],
//! which hand the database to [`ChunkGenerator::generate_chunk_with`]:
//!
//! ```rust,ignore
//! let mut map = db.take::<EntityMap>(region, "map")?;
//! let tile = map.get_with(&mut db, x, y, z);
//! db.insert(region, "map", map);
//! ```
//!
//! ## Key Range
//!
//! Cells whose chunk falls outside the key range (see [`crate::chunk`]) are
//! never stored: `get` returns [`Entity::NONE`] and `set` logs a warning and
//! drops the write.

use std::collections::hash_map::{self, HashMap};
use std::fmt;

use rogue_core::{Entity, EntityDb};
use tracing::{trace, warn};

use crate::chunk::{local_index, ChunkCoord, ChunkKey, MapChunk};

/// Populates chunks on demand.
///
/// Implementations must call [`ChunkStore::create_chunk`] for exactly the
/// requested coordinate and fill it before returning. They are invoked at
/// most once per coordinate for the lifetime of the map.
pub trait ChunkGenerator {
    /// Materializes and fills the chunk at `coord` (in chunk units).
    fn generate_chunk(&mut self, chunks: &mut ChunkStore, coord: ChunkCoord);

    /// Same as [`generate_chunk`](Self::generate_chunk), with the entity
    /// database at hand for creating tile entities.
    ///
    /// Called from [`EntityMap::get_with`] and [`EntityMap::set_with`].
    /// Defaults to `generate_chunk`.
    fn generate_chunk_with(
        &mut self,
        db: &mut EntityDb,
        chunks: &mut ChunkStore,
        coord: ChunkCoord,
    ) {
        let _ = db;
        self.generate_chunk(chunks, coord);
    }

    /// Clones this generator behind a fresh box.
    fn box_clone(&self) -> Box<dyn ChunkGenerator>;
}

impl Clone for Box<dyn ChunkGenerator> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// The materialized chunks of a map, without its generator.
///
/// Cell access here never generates anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkStore {
    chunks: HashMap<ChunkKey, MapChunk>,
}

impl ChunkStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the chunk at `coord` has been materialized, even if every
    /// cell in it is still empty.
    #[inline]
    #[must_use]
    pub fn chunk_generated(&self, coord: ChunkCoord) -> bool {
        coord.key().is_some_and(|key| self.chunks.contains_key(&key))
    }

    /// Materializes a blank chunk at `coord`, replacing any existing one.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is outside the key range.
    #[track_caller]
    pub fn create_chunk(&mut self, coord: ChunkCoord) -> &mut MapChunk {
        let Some(key) = coord.key() else {
            panic!("chunk {coord} is outside the addressable key range");
        };
        trace!(chunk = %coord, "materialized chunk");
        match self.chunks.entry(key) {
            hash_map::Entry::Occupied(mut slot) => {
                slot.insert(MapChunk::new());
                slot.into_mut()
            }
            hash_map::Entry::Vacant(slot) => slot.insert(MapChunk::new()),
        }
    }

    /// Gets the chunk at `coord`.
    #[inline]
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&MapChunk> {
        coord.key().and_then(|key| self.chunks.get(&key))
    }

    /// Gets the chunk at `coord` mutably.
    #[inline]
    pub fn chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut MapChunk> {
        coord.key().and_then(|key| self.chunks.get_mut(&key))
    }

    /// Reads a cell, or `None` if its chunk is not materialized.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i64, y: i64, z: i64) -> Option<Entity> {
        self.chunk(ChunkCoord::from_cell(x, y, z))
            .map(|chunk| chunk.get(local_index(x, y, z)))
    }

    /// Writes a cell. Returns `false` if its chunk is not materialized.
    #[inline]
    pub fn set(&mut self, x: i64, y: i64, z: i64, eid: Entity) -> bool {
        match self.chunk_mut(ChunkCoord::from_cell(x, y, z)) {
            Some(chunk) => {
                chunk.set(local_index(x, y, z), eid);
                true
            }
            None => false,
        }
    }

    /// Number of materialized chunks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Checks if no chunk is materialized.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Coordinates of every materialized chunk, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().map(|key| key.coord())
    }
}

/// Chunked tile storage with an optional on-demand generator.
///
/// # Example
///
/// ```rust,ignore
/// let mut map = EntityMap::new();
/// map.set(5, 5, 1, Entity::new(7));
/// assert_eq!(map.get(5, 5, 1), Entity::new(7));
/// assert_eq!(map.get(5, 5, 2), Entity::NONE);
/// ```
#[derive(Clone, Default)]
pub struct EntityMap {
    /// Materialized chunks.
    store: ChunkStore,
    /// Called on a miss.
    generator: Option<Box<dyn ChunkGenerator>>,
}

impl EntityMap {
    /// Creates an empty map with no generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map that generates chunks with `generator`.
    #[must_use]
    pub fn with_generator<G: ChunkGenerator + 'static>(generator: G) -> Self {
        Self {
            store: ChunkStore::new(),
            generator: Some(Box::new(generator)),
        }
    }

    /// Attaches a generator, replacing any previous one.
    pub fn register_generator<G: ChunkGenerator + 'static>(&mut self, generator: G) {
        self.generator = Some(Box::new(generator));
    }

    /// Detaches and returns the generator.
    pub fn clear_generator(&mut self) -> Option<Box<dyn ChunkGenerator>> {
        self.generator.take()
    }

    /// Checks if a generator is attached.
    #[must_use]
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Ensures the chunk at `coord` exists, generating it if possible.
    ///
    /// Returns `true` if the chunk is materialized afterwards. Chunks outside
    /// the key range are never generated.
    fn materialize(&mut self, db: Option<&mut EntityDb>, coord: ChunkCoord) -> bool {
        if self.store.chunk_generated(coord) {
            return true;
        }
        if !coord.is_addressable() {
            return false;
        }
        let Some(generator) = self.generator.as_mut() else {
            return false;
        };

        trace!(chunk = %coord, with_db = db.is_some(), "generating chunk");
        match db {
            Some(db) => generator.generate_chunk_with(db, &mut self.store, coord),
            None => generator.generate_chunk(&mut self.store, coord),
        }

        if self.store.chunk_generated(coord) {
            true
        } else {
            warn!(chunk = %coord, "generator returned without materializing its chunk");
            false
        }
    }

    fn read(&mut self, db: Option<&mut EntityDb>, x: i64, y: i64, z: i64) -> Entity {
        if !self.materialize(db, ChunkCoord::from_cell(x, y, z)) {
            return Entity::NONE;
        }
        self.store.get(x, y, z).unwrap_or(Entity::NONE)
    }

    fn write(&mut self, db: Option<&mut EntityDb>, x: i64, y: i64, z: i64, eid: Entity) {
        let coord = ChunkCoord::from_cell(x, y, z);
        if !coord.is_addressable() {
            warn!(x, y, z, chunk = %coord, "dropping write outside the addressable key range");
            return;
        }
        if !self.materialize(db, coord) {
            self.store.create_chunk(coord);
        }
        self.store.set(x, y, z, eid);
    }

    /// Gets the entity at `(x, y, z)`, generating its chunk on a miss.
    ///
    /// Returns [`Entity::NONE`] for a cell never written, for a missing
    /// chunk when no generator is attached, or for a cell outside the key
    /// range.
    pub fn get(&mut self, x: i64, y: i64, z: i64) -> Entity {
        self.read(None, x, y, z)
    }

    /// [`get`](Self::get), passing `db` to the generator on a miss.
    pub fn get_with(&mut self, db: &mut EntityDb, x: i64, y: i64, z: i64) -> Entity {
        self.read(Some(db), x, y, z)
    }

    /// Reads `(x, y, z)` without generating anything.
    #[must_use]
    pub fn peek(&self, x: i64, y: i64, z: i64) -> Entity {
        self.store.get(x, y, z).unwrap_or(Entity::NONE)
    }

    /// Sets the entity at `(x, y, z)`.
    ///
    /// A missing chunk is generated first. If nothing can generate it, a
    /// blank chunk is materialized so the write is not lost. Writes outside
    /// the key range are dropped with a warning.
    pub fn set(&mut self, x: i64, y: i64, z: i64, eid: Entity) {
        self.write(None, x, y, z, eid);
    }

    /// [`set`](Self::set), passing `db` to the generator on a miss.
    pub fn set_with(&mut self, db: &mut EntityDb, x: i64, y: i64, z: i64, eid: Entity) {
        self.write(Some(db), x, y, z, eid);
    }

    /// Checks if the chunk at `coord` (in chunk units) has been materialized.
    #[must_use]
    pub fn chunk_generated(&self, coord: ChunkCoord) -> bool {
        self.store.chunk_generated(coord)
    }

    /// Materializes a blank chunk at `coord`, replacing any existing one.
    ///
    /// # Panics
    ///
    /// Panics if `coord` is outside the key range.
    #[track_caller]
    pub fn create_chunk(&mut self, coord: ChunkCoord) -> &mut MapChunk {
        self.store.create_chunk(coord)
    }

    /// Gets the chunk at `coord`, if materialized.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&MapChunk> {
        self.store.chunk(coord)
    }

    /// Number of materialized chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.store.len()
    }

    /// The materialized chunks.
    #[must_use]
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }
}

impl fmt::Debug for EntityMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMap")
            .field("chunks", &self.store.len())
            .field("generator", &self.generator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CHUNK_AXIS_MAX;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Fills each chunk with one entity and counts calls.
    #[derive(Clone)]
    struct Fill {
        eid: Entity,
        calls: Rc<Cell<usize>>,
    }

    impl ChunkGenerator for Fill {
        fn generate_chunk(&mut self, chunks: &mut ChunkStore, coord: ChunkCoord) {
            self.calls.set(self.calls.get() + 1);
            chunks.create_chunk(coord).fill(self.eid);
        }

        fn box_clone(&self) -> Box<dyn ChunkGenerator> {
            Box::new(self.clone())
        }
    }

    /// Never materializes anything.
    #[derive(Clone)]
    struct Broken;

    impl ChunkGenerator for Broken {
        fn generate_chunk(&mut self, _: &mut ChunkStore, _: ChunkCoord) {}

        fn box_clone(&self) -> Box<dyn ChunkGenerator> {
            Box::new(Broken)
        }
    }

    #[test]
    fn test_set_get_without_generator() {
        let mut map = EntityMap::new();
        map.set(5, 5, 1, Entity::new(7));
        assert_eq!(map.get(5, 5, 1), Entity::new(7));
        assert_eq!(map.get(5, 5, 2), Entity::NONE);
    }

    #[test]
    fn test_get_miss_without_generator_materializes_nothing() {
        let mut map = EntityMap::new();
        assert_eq!(map.get(1000, -1000, 3), Entity::NONE);
        assert_eq!(map.chunk_count(), 0);
    }

    #[test]
    fn test_generator_runs_once_per_chunk() {
        let calls = Rc::new(Cell::new(0));
        let mut map = EntityMap::with_generator(Fill {
            eid: Entity::new(1),
            calls: Rc::clone(&calls),
        });

        assert_eq!(map.get(100, 100, 0), Entity::new(1));
        assert!(map.chunk_generated(ChunkCoord::from_cell(100, 100, 0)));
        assert_eq!(map.get(101, 97, 3), Entity::new(1));
        map.set(96, 111, 2, Entity::new(5));
        assert_eq!(calls.get(), 1);

        map.set(0, 0, 0, Entity::new(5));
        assert_eq!(calls.get(), 2);
        assert_eq!(map.get(0, 0, 0), Entity::new(5));
        assert_eq!(map.get(0, 0, 1), Entity::new(1));
    }

    #[test]
    fn test_empty_generated_chunk_is_not_regenerated() {
        #[derive(Clone)]
        struct Blank(Rc<Cell<usize>>);
        impl ChunkGenerator for Blank {
            fn generate_chunk(&mut self, chunks: &mut ChunkStore, coord: ChunkCoord) {
                self.0.set(self.0.get() + 1);
                chunks.create_chunk(coord);
            }
            fn box_clone(&self) -> Box<dyn ChunkGenerator> {
                Box::new(self.clone())
            }
        }

        let calls = Rc::new(Cell::new(0));
        let mut map = EntityMap::with_generator(Blank(Rc::clone(&calls)));
        for _ in 0..3 {
            assert_eq!(map.get(-3, -3, -3), Entity::NONE);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_broken_generator_does_not_drop_writes() {
        let mut map = EntityMap::with_generator(Broken);
        assert_eq!(map.get(0, 0, 0), Entity::NONE);
        assert_eq!(map.chunk_count(), 0);

        map.set(0, 0, 0, Entity::new(3));
        assert_eq!(map.get(0, 0, 0), Entity::new(3));
    }

    #[test]
    fn test_create_chunk_overwrites() {
        let mut map = EntityMap::new();
        map.set(1, 1, 1, Entity::new(4));
        let chunk = map.create_chunk(ChunkCoord::new(0, 0, 0));
        assert!(chunk.is_empty());
        assert_eq!(map.get(1, 1, 1), Entity::NONE);
    }

    #[test]
    fn test_clone_is_deep() {
        let calls = Rc::new(Cell::new(0));
        let mut map = EntityMap::with_generator(Fill {
            eid: Entity::new(1),
            calls: Rc::clone(&calls),
        });
        map.set(0, 0, 0, Entity::new(2));

        let mut copy = map.clone();
        copy.set(0, 0, 0, Entity::new(3));
        assert!(copy.has_generator());
        assert_eq!(map.peek(0, 0, 0), Entity::new(2));
        assert_eq!(copy.peek(0, 0, 0), Entity::new(3));
    }

    #[test]
    fn test_far_cells_are_rejected_in_every_profile() {
        let calls = Rc::new(Cell::new(0));
        let mut map = EntityMap::with_generator(Fill {
            eid: Entity::new(1),
            calls: Rc::clone(&calls),
        });

        let far = 1i64 << 40;
        map.set(far, 0, 0, Entity::new(7));
        assert_eq!(map.get(far, 0, 0), Entity::NONE);
        assert_eq!(map.peek(far, 0, 0), Entity::NONE);
        assert!(!map.chunk_generated(ChunkCoord::from_cell(far, 0, 0)));
        assert_eq!(map.chunk_count(), 0);
        assert_eq!(calls.get(), 0);

        // The aliased in-range chunk is untouched.
        assert_eq!(map.get(0, 0, 0), Entity::new(1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    #[should_panic(expected = "outside the addressable key range")]
    fn test_create_far_chunk_panics() {
        let mut store = ChunkStore::new();
        store.create_chunk(ChunkCoord::new(CHUNK_AXIS_MAX + 1, 0, 0));
    }

    /// Creates one fresh entity per chunk and fills the chunk with it.
    #[derive(Clone)]
    struct Spawn;

    impl ChunkGenerator for Spawn {
        fn generate_chunk(&mut self, chunks: &mut ChunkStore, coord: ChunkCoord) {
            chunks.create_chunk(coord);
        }

        fn generate_chunk_with(
            &mut self,
            db: &mut EntityDb,
            chunks: &mut ChunkStore,
            coord: ChunkCoord,
        ) {
            let tile = db.new_entity(&["tile"]);
            *db.get_mut::<i64>(tile, "tile").unwrap() = coord.x;
            chunks.create_chunk(coord).fill(tile);
        }

        fn box_clone(&self) -> Box<dyn ChunkGenerator> {
            Box::new(Spawn)
        }
    }

    #[test]
    fn test_generator_creates_entities_through_db() {
        let mut db = EntityDb::new();
        db.register_default::<i64>("tile");
        let mut map = EntityMap::with_generator(Spawn);

        let first = map.get_with(&mut db, 40, 0, 0);
        assert!(first.is_some());
        assert_eq!(db.get::<i64>(first, "tile"), Some(&2));
        assert_eq!(map.get_with(&mut db, 41, 1, 1), first);

        map.set_with(&mut db, -1, 0, 0, Entity::new(99));
        let second = map.peek(-2, 0, 0);
        assert_ne!(second, first);
        assert_eq!(db.get::<i64>(second, "tile"), Some(&-1));
        assert_eq!(db.search(&["tile"]), vec![first, second]);
    }

    #[test]
    fn test_plain_get_uses_generate_chunk() {
        let mut map = EntityMap::with_generator(Spawn);
        assert_eq!(map.get(0, 0, 0), Entity::NONE);
        assert!(map.chunk_generated(ChunkCoord::new(0, 0, 0)));
    }

    #[test]
    fn test_store_never_generates() {
        let mut store = ChunkStore::new();
        assert_eq!(store.get(0, 0, 0), None);
        assert!(!store.set(0, 0, 0, Entity::new(1)));
        store.create_chunk(ChunkCoord::new(0, 0, 0));
        assert!(store.set(0, 0, 0, Entity::new(1)));
        assert_eq!(store.get(0, 0, 0), Some(Entity::new(1)));
        assert_eq!(store.coords().collect::<Vec<_>>(), vec![ChunkCoord::new(0, 0, 0)]);
    }
}
