//! # Entity Configuration
//!
//! Policy knobs of the entity core, loadable from TOML.
//!
//! ```toml
//! capacity = 10000
//! max_misc_entities = 300
//! max_litter = 500
//! map_size_tiles = 256
//!
//! [[max_zoom]]
//! kind = "litter"
//! level = 1
//! ```
//!
//! Every field is optional and defaults to the stock game value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use midway_shared::{
    MapExtent, COORDS_XY_STEP, MAXIMUM_MAP_SIZE_TECHNICAL, MAX_ENTITIES, MAX_LITTER,
    MAX_MISC_ENTITIES,
};

use crate::entity::EntityKind;
use crate::error::ConfigError;
use crate::viewport::ZoomTable;

/// Replaces the invalidation zoom level of one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomOverride {
    /// Kind to override.
    pub kind: EntityKind,
    /// New maximum zoom level.
    pub level: u8,
}

/// Entity core configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntityConfig {
    /// Number of entity slots.
    pub capacity: usize,
    /// Misc reservation budget.
    pub max_misc_entities: usize,
    /// Litter count above which the newest litter is recycled.
    pub max_litter: usize,
    /// Map edge length in tiles.
    pub map_size_tiles: usize,
    /// Per-kind zoom overrides, applied over the stock table.
    pub max_zoom: Vec<ZoomOverride>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_ENTITIES,
            max_misc_entities: MAX_MISC_ENTITIES,
            max_litter: MAX_LITTER,
            map_size_tiles: MAXIMUM_MAP_SIZE_TECHNICAL,
            max_zoom: Vec::new(),
        }
    }
}

impl EntityConfig {
    /// Largest map the 16-bit world coordinate range can address.
    pub const MAX_MAP_SIZE_TILES: usize = (u16::MAX as usize) / (COORDS_XY_STEP as usize) + 1;

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed input and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// As [`from_toml_str`](Self::from_toml_str), plus [`ConfigError::Io`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            path = %path.display(),
            capacity = config.capacity,
            map_size = config.map_size_tiles,
            "Loaded entity configuration"
        );
        Ok(config)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 || self.capacity > usize::from(u16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "capacity must be in 1..={}, got {}",
                u16::MAX,
                self.capacity
            )));
        }
        if self.max_misc_entities > self.capacity {
            return Err(ConfigError::Invalid(format!(
                "max_misc_entities ({}) exceeds capacity ({})",
                self.max_misc_entities, self.capacity
            )));
        }
        if self.max_litter == 0 {
            return Err(ConfigError::Invalid("max_litter must be positive".into()));
        }
        if self.map_size_tiles == 0 || self.map_size_tiles > Self::MAX_MAP_SIZE_TILES {
            return Err(ConfigError::Invalid(format!(
                "map_size_tiles must be in 1..={}, got {}",
                Self::MAX_MAP_SIZE_TILES,
                self.map_size_tiles
            )));
        }
        if let Some(bad) = self.max_zoom.iter().find(|o| o.kind == EntityKind::Null) {
            return Err(ConfigError::Invalid(format!(
                "max_zoom override for {:?} kind",
                bad.kind
            )));
        }
        Ok(())
    }

    /// The stock zoom table with this config's overrides applied.
    #[must_use]
    pub fn zoom_table(&self) -> ZoomTable {
        let mut table = ZoomTable::default();
        for o in &self.max_zoom {
            table.set(o.kind, o.level);
        }
        table
    }

    /// Map extent described by `map_size_tiles`.
    ///
    /// # Panics
    ///
    /// Panics if the config has not passed [`validate`](Self::validate).
    #[must_use]
    pub fn map_extent(&self) -> MapExtent {
        MapExtent::new(self.map_size_tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EntityConfig::default();
        assert_eq!(config.capacity, 10_000);
        assert_eq!(config.max_misc_entities, 300);
        assert_eq!(config.max_litter, 500);
        assert_eq!(config.map_size_tiles, 256);
        assert!(config.validate().is_ok());
        assert_eq!(EntityConfig::MAX_MAP_SIZE_TILES, 2048);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(
            EntityConfig::from_toml_str("").unwrap(),
            EntityConfig::default()
        );
    }

    #[test]
    fn test_parse_overrides() {
        let config = EntityConfig::from_toml_str(
            r#"
            capacity = 64
            max_misc_entities = 8

            [[max_zoom]]
            kind = "litter"
            level = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.capacity, 64);
        assert_eq!(config.max_misc_entities, 8);
        assert_eq!(config.map_size_tiles, 256);
        let table = config.zoom_table();
        assert_eq!(table.get(EntityKind::Litter), 1);
        assert_eq!(table.get(EntityKind::Duck), 1);
        assert_eq!(table.get(EntityKind::Guest), 2);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            EntityConfig::from_toml_str("capacity = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EntityConfig::from_toml_str("capacity = 70000"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EntityConfig::from_toml_str("capacity = 10\nmax_misc_entities = 11"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EntityConfig::from_toml_str("map_size_tiles = 4096"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(matches!(
            EntityConfig::from_toml_str("capacty = 10"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            EntityConfig::load("/nonexistent/midway.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
