//! # Region Construction

use rogue_core::{Entity, EntityDb};
use rogue_procedural::{CaveGenerator, EntityMap, WorldSeed};
use tracing::debug;

use crate::components::{Art, Color, ART, MAP};
use crate::config::CaveConfig;

/// Creates a cave region and returns its entity.
///
/// Two tile entities are created first, a wall and a floor, each carrying
/// [`Art`]. The region entity gets a `map` component whose generator paints
/// every new chunk with those two tiles.
///
/// # Panics
///
/// Panics if the base components are not registered.
pub fn build_cave_region(db: &mut EntityDb, config: &CaveConfig) -> Entity {
    let wall = db.new_entity(&[]);
    db.insert(
        wall,
        ART,
        Art::new(config.wall_symbol, config.wall_color, Color::BLACK),
    );

    let floor = db.new_entity(&[]);
    db.insert(
        floor,
        ART,
        Art::new(config.floor_symbol, config.floor_color, Color::BLACK),
    );

    let cave = CaveGenerator::new(WorldSeed::new(config.seed), wall, floor)
        .with_wall_chance(config.wall_chance);

    let region = db.new_entity(&[]);
    db.insert(region, MAP, EntityMap::with_generator(cave));

    debug!(
        %region,
        %wall,
        %floor,
        seed = config.seed,
        wall_chance = config.wall_chance,
        "built cave region"
    );
    region
}
