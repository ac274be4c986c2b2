//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Material used to pad the portal window where no world block fits.
pub const DEFAULT_BACKGROUND_BLOCK: &str = "black_concrete";

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Portal rendering settings.
    pub render: RenderConfig,
    /// World query settings.
    pub world: WorldConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Portal rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Horizontal half-extent of the replicated region around each portal
    /// endpoint, in blocks.
    pub portal_effect_size_xz: f64,
    /// Vertical half-extent of the replicated region, in blocks.
    pub portal_effect_size_y: f64,
    /// Ticks between full entity metadata snapshots. Metadata packets are
    /// expensive, so they refresh on an interval rather than every tick.
    pub entity_metadata_update_interval: u64,
    /// Ticks between block-state refreshes of the portal view.
    pub block_update_interval: u64,
    /// Material name for the portal background. Unknown names fall back to
    /// [`DEFAULT_BACKGROUND_BLOCK`] with a warning rather than failing.
    pub background_block: String,
}

/// World query configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Ticks between nearby-entity list refreshes. A box query over the
    /// whole effect region is too expensive to run every tick.
    pub entity_check_interval: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            portal_effect_size_xz: 15.0,
            portal_effect_size_y: 10.0,
            entity_metadata_update_interval: 5,
            block_update_interval: 4,
            background_block: DEFAULT_BACKGROUND_BLOCK.to_string(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            entity_check_interval: 10,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

/// Material names are lowercase identifiers; the host registry does the
/// real lookup, this only rejects obviously malformed names.
fn is_material_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl RenderConfig {
    /// The material to fill the portal background with.
    ///
    /// An unresolvable name logs a warning and falls back to the default
    /// instead of failing; a bad cosmetic setting must not stop the engine.
    pub fn resolve_background_block(&self) -> &str {
        if is_material_name(&self.background_block) {
            &self.background_block
        } else {
            log::warn!(
                "unknown material for portal background block {:?}",
                self.background_block
            );
            log::warn!("using default of {}", DEFAULT_BACKGROUND_BLOCK);
            DEFAULT_BACKGROUND_BLOCK
        }
    }
}

impl Config {
    /// Checks the invariants the engine depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.portal_effect_size_xz < 1.0 || self.render.portal_effect_size_y < 1.0 {
            return Err(ConfigError::Invalid(
                "portal effect size must be at least one block".to_string(),
            ));
        }
        if self.render.entity_metadata_update_interval == 0 {
            return Err(ConfigError::Invalid(
                "entity metadata update interval must be at least 1".to_string(),
            ));
        }
        if self.render.block_update_interval == 0 {
            return Err(ConfigError::Invalid(
                "block update interval must be at least 1".to_string(),
            ));
        }
        if self.world.entity_check_interval == 0 {
            return Err(ConfigError::Invalid(
                "entity check interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
