//! # Lazy Generation Integration Tests
//!
//! Proves chunks are generated on first touch, exactly once, and that
//! reads and writes land where they should across chunk borders.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rogue_core::Entity;
use rogue_procedural::{
    CaveGenerator, ChunkCoord, ChunkGenerator, ChunkStore, EntityMap, WorldSeed, CELLS_PER_CHUNK,
    CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH,
};

/// Fills chunks with `Entity(1)` and records how often each was generated.
#[derive(Clone, Default)]
struct Recording {
    calls: Rc<RefCell<HashMap<ChunkCoord, usize>>>,
}

impl ChunkGenerator for Recording {
    fn generate_chunk(&mut self, chunks: &mut ChunkStore, coord: ChunkCoord) {
        *self.calls.borrow_mut().entry(coord).or_default() += 1;
        chunks.create_chunk(coord).fill(Entity::new(1));
    }

    fn box_clone(&self) -> Box<dyn ChunkGenerator> {
        Box::new(self.clone())
    }
}

/// Test: A never-touched coordinate is generated on read.
#[test]
fn test_get_generates_untouched_chunk() {
    let recording = Recording::default();
    let mut map = EntityMap::with_generator(recording.clone());

    assert_eq!(map.get(100, 100, 0), Entity::new(1));
    assert!(map.chunk_generated(ChunkCoord::from_cell(100, 100, 0)));

    assert_eq!(map.get(99, 110, 2), Entity::new(1));
    assert_eq!(recording.calls.borrow().len(), 1);
    assert_eq!(recording.calls.borrow()[&ChunkCoord::new(6, 6, 0)], 1);
}

/// Test: Walking across many chunks generates each one exactly once.
#[test]
fn test_walk_generates_each_chunk_once() {
    let recording = Recording::default();
    let mut map = EntityMap::with_generator(recording.clone());

    for pass in 0..3 {
        for x in -40..40 {
            for y in (-40..40).step_by(3) {
                for z in -5..5 {
                    if pass == 1 {
                        map.set(x, y, z, Entity::new(9));
                    } else {
                        map.get(x, y, z);
                    }
                }
            }
        }
    }

    let calls = recording.calls.borrow();
    assert_eq!(calls.len(), map.chunk_count());
    assert!(calls.values().all(|&count| count == 1));
}

/// Test: Writing every cell of a created chunk reads back exactly.
#[test]
fn test_create_chunk_round_trip() {
    let mut map = EntityMap::new();
    let coord = ChunkCoord::new(-3, 7, 2);
    map.create_chunk(coord);

    let (ox, oy, oz) = coord.origin();
    let mut next = 1u64;
    for x in 0..CHUNK_WIDTH as i64 {
        for y in 0..CHUNK_DEPTH as i64 {
            for z in 0..CHUNK_HEIGHT as i64 {
                map.set(ox + x, oy + y, oz + z, Entity::new(next));
                next += 1;
            }
        }
    }

    let mut expected = 1u64;
    for x in 0..CHUNK_WIDTH as i64 {
        for y in 0..CHUNK_DEPTH as i64 {
            for z in 0..CHUNK_HEIGHT as i64 {
                assert_eq!(map.get(ox + x, oy + y, oz + z), Entity::new(expected));
                expected += 1;
            }
        }
    }

    assert_eq!(map.chunk_count(), 1);
    assert_eq!(map.chunk(coord).map(|c| c.occupied()), Some(CELLS_PER_CHUNK));
}

/// Test: set then get returns the value for fresh and overwritten cells.
#[test]
fn test_set_then_get() {
    let mut map = EntityMap::with_generator(Recording::default());
    for (i, &(x, y, z)) in [(0, 0, 0), (-1, -1, -1), (15, 16, 3), (1 << 20, -(1 << 20), 7)]
        .iter()
        .enumerate()
    {
        let first = Entity::new(100 + i as u64);
        let second = Entity::new(200 + i as u64);
        map.set(x, y, z, first);
        assert_eq!(map.get(x, y, z), first);
        map.set(x, y, z, second);
        assert_eq!(map.get(x, y, z), second);
    }
}

/// Test: Two maps with the same cave seed agree cell for cell.
#[test]
fn test_cave_is_deterministic_across_maps() {
    let cave = CaveGenerator::new(WorldSeed::new(2024), Entity::new(1), Entity::new(2))
        .with_wall_chance(0.4);
    let mut forward = EntityMap::with_generator(cave);
    let mut backward = EntityMap::with_generator(cave);

    let forward_tiles: Vec<Entity> = (0..64).map(|x| forward.get(x, 5, 0)).collect();
    let mut backward_tiles: Vec<Entity> = (0..64).rev().map(|x| backward.get(x, 5, 0)).collect();
    backward_tiles.reverse();

    assert_eq!(forward_tiles, backward_tiles);
}
