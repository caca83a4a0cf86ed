//! # Components
//!
//! Game-level component types and the names they are registered under.

use rogue_core::{Entity, EntityDb};
use rogue_procedural::EntityMap;
use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, Idle};

/// Component name for [`Art`].
pub const ART: &str = "art";

/// Component name for [`Location`].
pub const LOCATION: &str = "location";

/// Component name for a region's [`EntityMap`].
pub const MAP: &str = "map";

/// Component name for [`Brain`].
pub const BRAIN: &str = "brain";

/// RGB color, each channel in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// White.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Mid grey.
    pub const GREY: Self = Self::rgb(0.5, 0.5, 0.5);

    /// Creates a color.
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Checks that every channel is within `0.0..=1.0`.
    #[must_use]
    pub fn is_valid(self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

/// A colored symbol.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Art {
    /// Glyph.
    pub symbol: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
}

impl Art {
    /// Creates art.
    #[must_use]
    pub const fn new(symbol: char, fg: Color, bg: Color) -> Self {
        Self { symbol, fg, bg }
    }
}

impl Default for Art {
    fn default() -> Self {
        Self::new(' ', Color::WHITE, Color::BLACK)
    }
}

/// Where an entity sits: a region entity plus a cell in that region's map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// The region entity owning the map.
    pub region: Entity,
    /// Cell x.
    pub x: i64,
    /// Cell y.
    pub y: i64,
    /// Cell z.
    pub z: i64,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub const fn new(region: Entity, x: i64, y: i64, z: i64) -> Self {
        Self { region, x, y, z }
    }
}

/// Holds an entity's behavior.
///
/// Cloning a brain clones the behavior through [`Behavior::box_clone`], so
/// an instanced entity never shares AI state with its template.
#[derive(Clone, Debug)]
pub struct Brain {
    /// The behavior run each turn.
    pub behavior: Box<dyn Behavior>,
}

impl Brain {
    /// Wraps a behavior.
    #[must_use]
    pub fn new<B: Behavior + 'static>(behavior: B) -> Self {
        Self {
            behavior: Box::new(behavior),
        }
    }
}

impl Default for Brain {
    fn default() -> Self {
        Self::new(Idle)
    }
}

/// Registers every base component with `db`.
///
/// # Panics
///
/// Panics if any of the names is already registered.
pub fn register_types(db: &mut EntityDb) {
    db.register_default::<Art>(ART);
    db.register_default::<Location>(LOCATION);
    db.register_default::<EntityMap>(MAP);
    db.register_default::<Brain>(BRAIN);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_types() {
        let mut db = EntityDb::new();
        register_types(&mut db);
        assert_eq!(
            db.component_names().collect::<Vec<_>>(),
            vec![ART, BRAIN, LOCATION, MAP]
        );
    }

    #[test]
    fn test_color_validation() {
        assert!(Color::GREY.is_valid());
        assert!(!Color::rgb(1.5, 0.0, 0.0).is_valid());
        assert!(!Color::rgb(0.0, f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_map_component_clones_deeply() {
        let mut db = EntityDb::new();
        register_types(&mut db);

        let region = db.new_entity(&[MAP]);
        db.get_mut::<EntityMap>(region, MAP)
            .unwrap()
            .set(1, 2, 3, Entity::new(50));

        let copy = db.instance(region);
        db.get_mut::<EntityMap>(copy, MAP)
            .unwrap()
            .set(1, 2, 3, Entity::new(60));

        assert_eq!(db.get::<EntityMap>(region, MAP).unwrap().peek(1, 2, 3), Entity::new(50));
        assert_eq!(db.get::<EntityMap>(copy, MAP).unwrap().peek(1, 2, 3), Entity::new(60));
    }
}
