//! Configuration for the terrain pipeline: RON on disk, serde structs with
//! defaults in code, and a CLI override layer.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, ForgeConfig, LodConfig, PlanetConfig, TerrainConfig};
pub use error::ConfigError;
