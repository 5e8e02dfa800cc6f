//! Command-line overrides for the configuration file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Command-line arguments. Every flag is optional; set flags override the
/// corresponding config file field.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tellus", about = "Cube-sphere terrain pipeline")]
pub struct CliArgs {
    /// Path to the config file (defaults to the platform config dir).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the planet seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the planet radius in meters.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Override the number of build workers (0 = machine default).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Override the log filter (e.g., "debug,tellus_forge=trace").
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Apply every set flag onto the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.planet.seed = seed;
        }
        if let Some(radius) = self.radius {
            config.planet.radius = radius;
        }
        if let Some(workers) = self.workers {
            config.forge.worker_threads = workers;
        }
        if let Some(log_level) = &self.log_level {
            config.debug.log_level = log_level.clone();
        }
    }
}
