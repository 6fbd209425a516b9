//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World sizing and worker settings.
    pub world: WorldConfig,
    /// Density-field generation settings.
    pub generation: GenerationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World sizing and worker settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk edge length in voxels; must be a power of two.
    pub chunk_size: u32,
    /// Render distance: cube radius, in chunks, kept resident.
    pub render_distance: u32,
    /// World-population worker threads (0 = one per logical CPU).
    pub workers: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 32,
            render_distance: 4,
            workers: 0,
        }
    }
}

/// Density-field generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// World seed for deterministic generation.
    pub seed: u32,
    /// Noise frequency applied to world coordinates.
    pub frequency: f64,
    /// Noise values above this threshold are solid.
    pub threshold: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 0.05,
            threshold: 0.0,
        }
    }
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter directive (e.g. "info" or "debug,quasar_world=trace").
    /// Empty means "use the built-in default".
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: String::new(),
        }
    }
}

impl Config {
    /// Loads configuration from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        ron::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Loads configuration, falling back to defaults if the file is absent.
    ///
    /// A present-but-malformed file is still an error; silently ignoring it
    /// would hide typos in a hand-edited config.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a RON file, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(ConfigError::Serialize)?;
        std::fs::write(path, contents).map_err(ConfigError::Write)
    }
}
