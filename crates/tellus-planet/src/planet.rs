//! The planet aggregate: six cube faces, one shared forge.

use glam::DVec3;
use tellus_cubesphere::{Direction, PlanetModel};
use tellus_forge::{ChunkForge, PlanetChunk, SurfaceFactory};
use tellus_lod::{ChunkTree, LodSettings};
use tellus_terrain::TerrainSettings;
use tracing::info;

/// A full planet surface: one [`ChunkTree`] per cube face, all feeding the
/// same [`ChunkForge`].
pub struct Planet {
    model: PlanetModel,
    sides: [ChunkTree; 6],
    forge: ChunkForge,
}

impl Planet {
    /// Create a planet with the given worker count for its forge.
    #[must_use]
    pub fn new(
        model: PlanetModel,
        terrain: TerrainSettings,
        settings: LodSettings,
        surface_factory: SurfaceFactory,
        worker_count: usize,
    ) -> Self {
        Self::with_forge(
            model,
            terrain,
            settings,
            surface_factory,
            ChunkForge::new(worker_count),
        )
    }

    /// Create a planet with a forge sized for this machine.
    #[must_use]
    pub fn with_default_workers(
        model: PlanetModel,
        terrain: TerrainSettings,
        settings: LodSettings,
        surface_factory: SurfaceFactory,
    ) -> Self {
        Self::with_forge(
            model,
            terrain,
            settings,
            surface_factory,
            ChunkForge::with_defaults(),
        )
    }

    fn with_forge(
        model: PlanetModel,
        terrain: TerrainSettings,
        settings: LodSettings,
        surface_factory: SurfaceFactory,
        forge: ChunkForge,
    ) -> Self {
        let sides = Direction::ALL.map(|direction| {
            ChunkTree::new(
                direction,
                model.clone(),
                terrain.clone(),
                settings.clone(),
                surface_factory.clone(),
            )
        });
        info!(
            planet = %model.name,
            radius = model.radius,
            min_depth = settings.min_depth,
            max_depth = settings.max_depth,
            workers = forge.worker_count(),
            "created planet"
        );
        Self {
            model,
            sides,
            forge,
        }
    }

    /// The planet's immutable parameters.
    #[must_use]
    pub fn model(&self) -> &PlanetModel {
        &self.model
    }

    /// One tick: update every face against the observer, then run the
    /// forge's scheduler.
    pub fn update(&mut self, observer_position: DVec3) {
        for side in &mut self.sides {
            side.update(observer_position, &mut self.forge);
        }
        self.forge.update();
    }

    /// Rebuild all six faces from scratch. Previous chunks are retired
    /// once each face's new root is usable.
    pub fn reset(&mut self) {
        info!(planet = %self.model.name, "resetting terrain");
        for side in &mut self.sides {
            side.reset(&mut self.forge);
        }
    }

    /// Run `f` on every chunk of every face.
    pub fn for_each_chunk(&self, mut f: impl FnMut(&std::sync::Arc<PlanetChunk>)) {
        for side in &self.sides {
            side.for_each_chunk(&mut f);
        }
    }

    /// Total number of chunks across all faces.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.sides.iter().map(ChunkTree::chunk_count).sum()
    }

    /// Total number of visible chunks across all faces.
    #[must_use]
    pub fn ready_chunk_count(&self) -> usize {
        self.sides.iter().map(ChunkTree::ready_chunk_count).sum()
    }

    /// The shared forge, for scheduling statistics.
    #[must_use]
    pub fn forge(&self) -> &ChunkForge {
        &self.forge
    }

    /// Raise the forge's per-tick apply budget.
    pub fn set_max_applies_per_tick(&mut self, max_applies: usize) {
        self.forge.set_max_applies_per_tick(max_applies);
    }

    /// Whether no build, apply, or deletion work remains.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.forge.is_idle()
    }

    /// Release every chunk of every face.
    pub fn dispose(&mut self) {
        for side in &mut self.sides {
            side.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tellus_forge::null_surface_factory;

    const RADIUS: f64 = 5.0;

    fn make_planet() -> Planet {
        let model = PlanetModel::new("Test", RADIUS, 42);
        let terrain = TerrainSettings {
            continent_base_height: 0.05,
            max_mountain_height: 0.1,
            max_bump_height: 0.01,
            ..Default::default()
        };
        let mut settings = LodSettings::with_depths(0, 2);
        settings.resolution = 2;
        Planet::new(model, terrain, settings, null_surface_factory(), 2)
    }

    fn settle(planet: &mut Planet, observer: DVec3) {
        let deadline = Instant::now() + Duration::from_secs(30);
        loop {
            let before = planet.chunk_count();
            planet.update(observer);
            if planet.is_settled() && planet.chunk_count() == before {
                planet.update(observer);
                if planet.is_settled() {
                    break;
                }
            }
            assert!(Instant::now() < deadline, "planet never settled");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// A distant observer sees one chunk per face.
    #[test]
    fn test_far_observer_keeps_six_root_chunks() {
        let mut planet = make_planet();
        settle(&mut planet, DVec3::X * (RADIUS * 500.0));

        assert_eq!(planet.chunk_count(), 6);
        assert_eq!(planet.ready_chunk_count(), 6);
    }

    /// A near observer refines the facing side more than the far side.
    #[test]
    fn test_near_observer_refines_facing_side() {
        let mut planet = make_planet();
        settle(&mut planet, DVec3::Y * RADIUS);

        assert!(
            planet.chunk_count() > 6,
            "no face refined near the observer"
        );
        let mut deepest_up = 0;
        let mut deepest_down = 0;
        planet.for_each_chunk(|chunk| match chunk.direction() {
            Direction::Up => deepest_up = deepest_up.max(chunk.depth()),
            Direction::Down => deepest_down = deepest_down.max(chunk.depth()),
            _ => {}
        });
        assert!(
            deepest_up > deepest_down,
            "facing side (depth {deepest_up}) should out-refine the far side (depth {deepest_down})"
        );
    }

    #[test]
    fn test_reset_returns_to_six_chunks() {
        let mut planet = make_planet();
        settle(&mut planet, DVec3::Y * RADIUS);
        assert!(planet.chunk_count() > 6);

        planet.reset();
        assert_eq!(planet.chunk_count(), 6);
        settle(&mut planet, DVec3::Y * (RADIUS * 500.0));
        assert_eq!(planet.chunk_count(), 6);
        assert_eq!(planet.ready_chunk_count(), 6);
    }

    #[test]
    fn test_dispose_releases_every_chunk() {
        let mut planet = make_planet();
        settle(&mut planet, DVec3::Y * (RADIUS * 500.0));

        let mut chunks = Vec::new();
        planet.for_each_chunk(|chunk| chunks.push(std::sync::Arc::clone(chunk)));
        planet.dispose();
        assert_eq!(planet.chunk_count(), 0);
        assert!(chunks.iter().all(|chunk| chunk.is_disposed()));
    }
}
