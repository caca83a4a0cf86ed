//! # Systems
//!
//! Free functions that operate on several components at once.

use rogue_core::{Entity, EntityDb};
use rogue_procedural::{ChunkCoord, EntityMap};
use tracing::trace;

use crate::behavior::Step;
use crate::components::{Brain, Location, BRAIN, LOCATION, MAP};

/// Runs `f` on `region`'s map while it is detached from `db`.
///
/// The map's generator gets the database on a miss, so it can create tile
/// entities. While it runs, `region` has no `map` component.
fn with_map<R>(
    db: &mut EntityDb,
    region: Entity,
    f: impl FnOnce(&mut EntityMap, &mut EntityDb) -> R,
) -> Option<R> {
    let mut map = db.take::<EntityMap>(region, MAP)?;
    let result = f(&mut map, db);
    db.insert(region, MAP, map);
    Some(result)
}

/// Puts `eid` at `(x, y, z)` in `region`.
///
/// The cell is overwritten and `eid` gets a [`Location`]. A previous cell
/// the entity occupied is left as is. Returns `false` without touching
/// anything if `region` has no map or the cell is outside the map's
/// addressable range.
///
/// # Panics
///
/// Panics if the base components are not registered.
pub fn place(db: &mut EntityDb, eid: Entity, region: Entity, x: i64, y: i64, z: i64) -> bool {
    if !ChunkCoord::from_cell(x, y, z).is_addressable() {
        return false;
    }
    if with_map(db, region, |map, db| map.set_with(db, x, y, z, eid)).is_none() {
        return false;
    }
    db.insert(eid, LOCATION, Location::new(region, x, y, z));
    trace!(%eid, %region, x, y, z, "placed");
    true
}

/// The entity at `(x, y, z)` in `region`, generating its chunk if needed.
///
/// Returns [`Entity::NONE`] if `region` has no map.
///
/// # Panics
///
/// Panics if the `map` component is not registered.
#[must_use]
pub fn tile_at(db: &mut EntityDb, region: Entity, x: i64, y: i64, z: i64) -> Entity {
    with_map(db, region, |map, db| map.get_with(db, x, y, z)).unwrap_or(Entity::NONE)
}

/// Runs `eid`'s brain once and returns the step it chose.
///
/// The brain is detached while it runs so the behavior can read the whole
/// database. Returns `None` if `eid` has no brain.
///
/// # Panics
///
/// Panics if the `brain` component is not registered.
pub fn think(db: &mut EntityDb, eid: Entity) -> Option<Step> {
    let mut brain = db.take::<Brain>(eid, BRAIN)?;
    let step = brain.behavior.act(eid, db);
    db.insert(eid, BRAIN, brain);
    Some(step)
}
