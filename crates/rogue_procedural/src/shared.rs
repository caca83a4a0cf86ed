//! # Thread-Shared Entity Map
//!
//! A `Send + Sync` variant of [`EntityMap`](crate::EntityMap) for callers
//! that touch the world from several threads.
//!
//! ## Locking
//!
//! ```text
//! slots:  RwLock<HashMap<ChunkKey, Slot>>     <- held only to find/insert a slot
//! Slot:   Arc<Mutex<Option<MapChunk>>>         <- held for the whole access
//! ```
//!
//! A miss fills the chunk while holding its slot lock. A second thread
//! asking for the same chunk blocks on that lock and then sees the filled
//! chunk, so each chunk is generated at most once. Different chunks never
//! contend beyond the brief table lookup.
//!
//! Without a filler, reads never create slots; only writes do. Cells outside
//! the chunk key range read as [`Entity::NONE`] and writes to them are
//! dropped with a warning.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rogue_core::Entity;
use tracing::{trace, warn};

use crate::chunk::{local_index, ChunkCoord, ChunkKey, MapChunk};

/// Fills a fresh chunk for a [`SharedEntityMap`].
///
/// Unlike [`ChunkGenerator`](crate::ChunkGenerator), the map hands over the
/// chunk to fill, so a filler cannot fail to materialize it.
pub trait ChunkFiller: Send + Sync {
    /// Populates `chunk`, which will be stored at `coord`.
    fn fill_chunk(&self, coord: ChunkCoord, chunk: &mut MapChunk);
}

type Slot = Arc<Mutex<Option<MapChunk>>>;

/// Thread-safe chunked map with at-most-once generation per chunk.
#[derive(Default)]
pub struct SharedEntityMap {
    /// One slot per chunk ever requested.
    slots: RwLock<HashMap<ChunkKey, Slot>>,
    /// Fills missing chunks.
    filler: Option<Arc<dyn ChunkFiller>>,
}

impl SharedEntityMap {
    /// Creates an empty map with no filler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map that fills missing chunks with `filler`.
    #[must_use]
    pub fn with_filler<F: ChunkFiller + 'static>(filler: F) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            filler: Some(Arc::new(filler)),
        }
    }

    /// Finds or inserts the slot for `key`.
    fn slot(&self, key: ChunkKey) -> Slot {
        if let Some(slot) = self.slots.read().get(&key) {
            return Arc::clone(slot);
        }
        Arc::clone(self.slots.write().entry(key).or_default())
    }

    /// Fills `chunk` if it is still missing. Returns `false` if there is no
    /// filler to do so.
    fn ensure(&self, coord: ChunkCoord, chunk: &mut Option<MapChunk>) -> bool {
        if chunk.is_some() {
            return true;
        }
        let Some(filler) = &self.filler else {
            return false;
        };

        trace!(chunk = %coord, "filling shared chunk");
        let mut fresh = MapChunk::new();
        filler.fill_chunk(coord, &mut fresh);
        *chunk = Some(fresh);
        true
    }

    /// Gets the entity at `(x, y, z)`, filling its chunk on a miss.
    #[must_use]
    pub fn get(&self, x: i64, y: i64, z: i64) -> Entity {
        let coord = ChunkCoord::from_cell(x, y, z);
        let Some(key) = coord.key() else {
            return Entity::NONE;
        };
        let slot = if self.filler.is_some() {
            self.slot(key)
        } else {
            match self.slots.read().get(&key) {
                Some(slot) => Arc::clone(slot),
                None => return Entity::NONE,
            }
        };
        let mut guard = slot.lock();
        if !self.ensure(coord, &mut guard) {
            return Entity::NONE;
        }
        guard
            .as_ref()
            .map_or(Entity::NONE, |chunk| chunk.get(local_index(x, y, z)))
    }

    /// Sets the entity at `(x, y, z)`, filling its chunk first on a miss.
    ///
    /// Without a filler a blank chunk is materialized.
    pub fn set(&self, x: i64, y: i64, z: i64, eid: Entity) {
        let coord = ChunkCoord::from_cell(x, y, z);
        let Some(key) = coord.key() else {
            warn!(x, y, z, chunk = %coord, "dropping write outside the addressable key range");
            return;
        };
        let slot = self.slot(key);
        let mut guard = slot.lock();
        self.ensure(coord, &mut guard);
        guard
            .get_or_insert_with(MapChunk::new)
            .set(local_index(x, y, z), eid);
    }

    /// Checks if the chunk at `coord` has been materialized.
    ///
    /// Blocks while another thread is filling that chunk.
    #[must_use]
    pub fn chunk_generated(&self, coord: ChunkCoord) -> bool {
        let Some(key) = coord.key() else {
            return false;
        };
        let slot = self.slots.read().get(&key).map(Arc::clone);
        slot.is_some_and(|slot| slot.lock().is_some())
    }

    /// Number of materialized chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        let slots: Vec<Slot> = self.slots.read().values().map(Arc::clone).collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }
}

impl fmt::Debug for SharedEntityMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEntityMap")
            .field("slots", &self.slots.read().len())
            .field("filler", &self.filler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl ChunkFiller for Counting {
        fn fill_chunk(&self, _: ChunkCoord, chunk: &mut MapChunk) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::yield_now();
            chunk.fill(Entity::new(1));
        }
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedEntityMap>();
    }

    #[test]
    fn test_without_filler() {
        let map = SharedEntityMap::new();
        assert_eq!(map.get(5, 5, 1), Entity::NONE);
        assert!(!map.chunk_generated(ChunkCoord::new(0, 0, 0)));

        map.set(5, 5, 1, Entity::new(7));
        assert_eq!(map.get(5, 5, 1), Entity::new(7));
        assert_eq!(map.get(5, 5, 2), Entity::NONE);
        assert_eq!(map.chunk_count(), 1);
    }

    #[test]
    fn test_reads_without_filler_create_no_slots() {
        let map = SharedEntityMap::new();
        for i in 0..1000 {
            assert_eq!(map.get(i * 16, 0, 0), Entity::NONE);
        }
        assert_eq!(map.slots.read().len(), 0);
        assert_eq!(map.chunk_count(), 0);

        map.set(0, 0, 0, Entity::new(3));
        assert_eq!(map.slots.read().len(), 1);
        assert_eq!(map.get(0, 0, 0), Entity::new(3));
    }

    #[test]
    fn test_far_cells_are_rejected() {
        let map = SharedEntityMap::new();
        let far = 1i64 << 40;
        map.set(far, 0, 0, Entity::new(7));
        assert_eq!(map.get(far, 0, 0), Entity::NONE);
        assert!(!map.chunk_generated(ChunkCoord::from_cell(far, 0, 0)));
        assert_eq!(map.get(0, 0, 0), Entity::NONE);
        assert_eq!(map.slots.read().len(), 0);
    }

    #[test]
    fn test_concurrent_access_fills_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let map = Arc::new(SharedEntityMap::with_filler(Counting {
            calls: Arc::clone(&calls),
        }));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let map = Arc::clone(&map);
                thread::spawn(move || map.get(i, 15 - i, 1))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Entity::new(1));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(map.chunk_generated(ChunkCoord::new(0, 0, 0)));
    }
}
