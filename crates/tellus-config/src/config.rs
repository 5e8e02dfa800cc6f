//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration of the terrain pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Planet parameters.
    pub planet: PlanetConfig,
    /// Terrain layer parameters.
    pub terrain: TerrainConfig,
    /// Quadtree depth and vertex density settings.
    pub lod: LodConfig,
    /// Worker pool and scheduler settings.
    pub forge: ForgeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Planet parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Planet name.
    pub name: String,
    /// Radius in meters.
    pub radius: f64,
    /// Seed for all procedural generation.
    pub seed: u64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            name: "Tellus".to_string(),
            radius: 6_371_000.0,
            seed: 42,
        }
    }
}

/// Terrain layer parameters, mirroring the sampler settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Spatial frequency of the continent layer.
    pub continents_frequency: f64,
    /// Ocean share of the sphere, in \[0, 1\].
    pub continents_fragmentation: f64,
    /// Continental shelf height in meters.
    pub continent_base_height: f64,
    /// Spatial frequency of the mountain layer.
    pub mountains_frequency: f64,
    /// Tallest possible mountain in meters.
    pub max_mountain_height: f64,
    /// Spatial frequency of the bump layer.
    pub bumps_frequency: f64,
    /// Bump layer amplitude in meters.
    pub max_bump_height: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            continents_frequency: 2.5,
            continents_fragmentation: 0.6,
            continent_base_height: 1_500.0,
            mountains_frequency: 30.0,
            max_mountain_height: 6_000.0,
            bumps_frequency: 300.0,
            max_bump_height: 250.0,
        }
    }
}

/// Quadtree settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Depth the surface never coarsens past.
    pub min_depth: usize,
    /// Target spacing between adjacent vertices at full detail, in meters.
    /// The maximum depth is derived from this.
    pub min_vertex_spacing: f64,
    /// Grid cells per chunk side.
    pub resolution: u32,
    /// Strength of the detail kernel's falloff.
    pub falloff: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            min_depth: 0,
            min_vertex_spacing: 2.0,
            resolution: 64,
            falloff: 0.8,
        }
    }
}

/// Worker pool and scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForgeConfig {
    /// Number of build workers; 0 picks a machine-sized default.
    pub worker_threads: usize,
    /// How many completed builds may be applied per tick.
    pub max_applies_per_tick: usize,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            max_applies_per_tick: 1,
        }
    }
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g., "info" or "debug,tellus_forge=trace"). Empty
    /// falls back to the built-in default.
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
    /// Load configuration from a RON file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        ron::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Load from the given path, or fall back to defaults if the file does
    /// not exist. Parse errors are still reported.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to a RON file, creating parent directories as
    /// needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default();
        let contents =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }
        std::fs::write(path, contents).map_err(ConfigError::Write)
    }

    /// The default config file location for this platform.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("tellus").join("config.ron"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_reasonable() {
        let config = Config::default();
        assert!(config.planet.radius > 0.0);
        assert!(config.lod.resolution > 0);
        assert!(config.lod.min_vertex_spacing > 0.0);
        assert!(config.forge.max_applies_per_tick >= 1);
    }

    #[test]
    fn test_round_trip_through_ron() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");

        let mut config = Config::default();
        config.planet.name = "Roundtrip".to_string();
        config.planet.seed = 7;
        config.lod.min_depth = 2;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.ron");
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.ron");
        std::fs::write(&path, "(planet: (seed: 99))").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.planet.seed, 99);
        assert_eq!(config.planet.name, PlanetConfig::default().name);
        assert_eq!(config.lod, LodConfig::default());
    }

    #[test]
    fn test_malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(planet: (radius: \"oops\"))").unwrap();

        match Config::load(&path) {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("config.ron");
        Config::default().save(&path).unwrap();
        assert!(path.exists());
    }
}
