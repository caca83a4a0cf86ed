//! # Cave Configuration
//!
//! TOML config for a generated cave region. Missing keys fall back to
//! [`CaveConfig::default`].
//!
//! ```toml
//! seed = 42
//! wall_chance = 0.1
//! wall_symbol = "#"
//! floor_symbol = "."
//!
//! [wall_color]
//! r = 0.6
//! g = 0.6
//! b = 0.6
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::components::Color;
use crate::error::{ConfigError, ConfigResult};

/// Settings for [`build_cave_region`](crate::build_cave_region).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// World seed for chunk generation.
    pub seed: u64,
    /// Probability that a cell is a wall.
    pub wall_chance: f64,
    /// Glyph for walls.
    pub wall_symbol: char,
    /// Glyph for floors.
    pub floor_symbol: char,
    /// Wall foreground.
    pub wall_color: Color,
    /// Floor foreground.
    pub floor_color: Color,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            wall_chance: 0.1,
            wall_symbol: '#',
            floor_symbol: '.',
            wall_color: Color::WHITE,
            floor_color: Color::GREY,
        }
    }
}

impl CaveConfig {
    /// Seed used when the file names none. TOML integers are signed, so it
    /// stays below `i64::MAX`.
    pub const DEFAULT_SEED: u64 = 0x5EED_CAFE_BABE_F00D;

    /// Parses and validates a config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`]
    /// when a value is out of range.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`CaveConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.wall_chance) {
            return Err(ConfigError::Invalid(format!(
                "wall_chance must be within 0.0..=1.0, got {}",
                self.wall_chance
            )));
        }
        if !self.wall_color.is_valid() {
            return Err(ConfigError::Invalid("wall_color channel out of range".into()));
        }
        if !self.floor_color.is_valid() {
            return Err(ConfigError::Invalid("floor_color channel out of range".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CaveConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_survives_toml_round_trip() {
        let text = toml::to_string(&CaveConfig::default()).unwrap();
        assert_eq!(CaveConfig::from_toml_str(&text).unwrap(), CaveConfig::default());
        assert!(i64::try_from(CaveConfig::DEFAULT_SEED).is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CaveConfig::from_toml_str("seed = 7\nwall_symbol = \"%\"").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.wall_symbol, '%');
        assert_eq!(config.floor_symbol, '.');
        assert!((config.wall_chance - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_colors_parse_from_tables() {
        let config =
            CaveConfig::from_toml_str("[floor_color]\nr = 0.0\ng = 0.25\nb = 1.0\n").unwrap();
        assert_eq!(config.floor_color, Color::rgb(0.0, 0.25, 1.0));
    }

    #[test]
    fn test_rejects_out_of_range_wall_chance() {
        for bad in ["wall_chance = 1.5", "wall_chance = -0.1", "wall_chance = nan"] {
            assert!(matches!(
                CaveConfig::from_toml_str(bad),
                Err(ConfigError::Invalid(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_color() {
        let err = CaveConfig::from_toml_str("[wall_color]\nr = 2.0\ng = 0.0\nb = 0.0\n");
        assert!(matches!(err, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            CaveConfig::from_toml_str("seed = \"not a number\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            CaveConfig::load("/definitely/not/here/cave.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
