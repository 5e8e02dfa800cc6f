//! Headless observer-descent demo.
//!
//! Builds a planet from the configuration, then flies an observer from
//! high orbit down to the surface, ticking the terrain pipeline and
//! logging how the quadtrees refine along the way.

use std::process::ExitCode;

use clap::Parser;
use glam::DVec3;
use tellus_config::{CliArgs, Config};
use tellus_cubesphere::PlanetModel;
use tellus_forge::null_surface_factory;
use tellus_lod::LodSettings;
use tellus_planet::Planet;
use tellus_terrain::TerrainSettings;
use tracing::{error, info};

/// Ticks of the descent itself.
const DESCENT_TICKS: u32 = 600;
/// Extra ticks allowed for the forge to drain after the descent.
const DRAIN_TICKS: u32 = 10_000;
/// Final altitude above the surface, in meters.
const FINAL_ALTITUDE: f64 = 2_000.0;

fn terrain_from_config(config: &Config) -> TerrainSettings {
    TerrainSettings {
        continents_frequency: config.terrain.continents_frequency,
        continents_fragmentation: config.terrain.continents_fragmentation,
        continent_base_height: config.terrain.continent_base_height,
        mountains_frequency: config.terrain.mountains_frequency,
        max_mountain_height: config.terrain.max_mountain_height,
        bumps_frequency: config.terrain.bumps_frequency,
        max_bump_height: config.terrain.max_bump_height,
    }
}

fn lod_from_config(config: &Config) -> LodSettings {
    let mut settings = LodSettings::for_planet(
        config.planet.radius,
        config.lod.min_vertex_spacing,
        config.lod.resolution,
    );
    settings.min_depth = config.lod.min_depth;
    settings.max_depth = settings.max_depth.max(settings.min_depth);
    settings.falloff = config.lod.falloff;
    settings
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_default(&config_path)?;
    args.apply(&mut config);

    tellus_log::init_logging(Some(&config.debug.log_level));
    info!(config = %config_path.display(), "starting descent demo");

    let terrain = terrain_from_config(&config);
    terrain.validate()?;
    let settings = lod_from_config(&config);

    let model = PlanetModel::new(config.planet.name.clone(), config.planet.radius, config.planet.seed);
    let mut planet = if config.forge.worker_threads == 0 {
        Planet::with_default_workers(model, terrain, settings, null_surface_factory())
    } else {
        Planet::new(
            model,
            terrain,
            settings,
            null_surface_factory(),
            config.forge.worker_threads,
        )
    };

    if config.forge.max_applies_per_tick > 1 {
        planet.set_max_applies_per_tick(config.forge.max_applies_per_tick);
    }

    let radius = config.planet.radius;
    let start_distance = radius * 6.0;
    let end_distance = radius + FINAL_ALTITUDE;

    for tick in 0..DESCENT_TICKS {
        // Exponential descent: fast through empty space, slow near the
        // ground where the tree churns the most.
        let t = f64::from(tick) / f64::from(DESCENT_TICKS - 1);
        let distance = start_distance * (end_distance / start_distance).powf(t);
        let observer = DVec3::Y * distance;

        planet.update(observer);

        if tick % 60 == 0 {
            info!(
                tick,
                altitude = distance - radius,
                chunks = planet.chunk_count(),
                ready = planet.ready_chunk_count(),
                queued = planet.forge().queued_task_count(),
                in_flight = planet.forge().in_flight_count(),
                "descending"
            );
        }
    }

    // Hold position until every outstanding build and deletion settles.
    let observer = DVec3::Y * end_distance;
    let mut drained = false;
    for _ in 0..DRAIN_TICKS {
        planet.update(observer);
        if planet.is_settled() {
            drained = true;
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(1));
    }
    if !drained {
        error!("forge still busy after descent drain window");
    }

    info!(
        chunks = planet.chunk_count(),
        ready = planet.ready_chunk_count(),
        "descent complete"
    );

    planet.dispose();
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tellus-demo: {err}");
            ExitCode::FAILURE
        }
    }
}
