//! One quadtree leaf and its renderable surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use glam::DVec3;
use tellus_cubesphere::{ChunkPath, Direction, cube_space_position};
use tellus_terrain::TerrainSettings;

use crate::forge::ChunkForge;
use crate::surface::{RenderSurface, SurfaceFactory};
use crate::task::{BuildPayload, BuildTask, ChunkVertexData, ForgeTask};

/// Everything a tree hands over when spawning a chunk.
#[derive(Clone)]
pub struct ChunkCreateContext {
    /// Name of the owning planet, carried into build payloads.
    pub planet_name: String,
    /// Planet diameter in meters.
    pub planet_diameter: f64,
    /// Planet seed.
    pub seed: u64,
    /// Terrain parameters for the elevation oracle.
    pub terrain: TerrainSettings,
    /// Grid cells per chunk side.
    pub resolution: u32,
    /// Minimum depth of the owning tree; chunks at or below it become
    /// visible as soon as their geometry arrives.
    pub min_depth: usize,
    /// Constructor for the chunk's renderable surface.
    pub surface_factory: SurfaceFactory,
}

/// One leaf of a face quadtree.
///
/// A chunk is created hidden, submits exactly one build task, receives its
/// vertex buffers from the forge, and is disposed exactly once — only
/// after whatever replaces it is usable.
pub struct PlanetChunk {
    path: ChunkPath,
    direction: Direction,
    depth: usize,
    cube_position: DVec3,
    sphere_position: DVec3,
    /// Chunks at or below the tree's min depth are the coarsest fallback
    /// and become visible directly when their geometry is applied.
    root_fallback: bool,
    has_data: AtomicBool,
    ready: AtomicBool,
    disposed: AtomicBool,
    surface: Mutex<Box<dyn RenderSurface>>,
}

impl PlanetChunk {
    /// Create a chunk at the given path and synchronously submit its build
    /// task to the forge.
    ///
    /// The surface starts disabled; it is shown once the deferred-deletion
    /// protocol decides the chunk may replace its predecessors.
    pub fn create(
        path: ChunkPath,
        direction: Direction,
        forge: &mut ChunkForge,
        ctx: &ChunkCreateContext,
    ) -> Arc<PlanetChunk> {
        let depth = path.depth();
        let cube_position = cube_space_position(ctx.planet_diameter, &path, direction);
        let sphere_position = cube_position.normalize() * (ctx.planet_diameter * 0.5);

        let mut surface = (ctx.surface_factory)();
        surface.set_enabled(false);

        let chunk = Arc::new(PlanetChunk {
            path,
            direction,
            depth,
            cube_position,
            sphere_position,
            root_fallback: depth <= ctx.min_depth,
            has_data: AtomicBool::new(false),
            ready: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            surface: Mutex::new(surface),
        });

        forge.add_task(ForgeTask::Build(BuildTask {
            payload: BuildPayload {
                planet_name: ctx.planet_name.clone(),
                planet_diameter: ctx.planet_diameter,
                seed: ctx.seed,
                direction,
                depth,
                cube_position,
                terrain: ctx.terrain.clone(),
                resolution: ctx.resolution,
            },
            chunk: Arc::clone(&chunk),
        }));

        chunk
    }

    fn surface(&self) -> MutexGuard<'_, Box<dyn RenderSurface>> {
        self.surface.lock().expect("chunk surface lock poisoned")
    }

    /// Hand the generated buffers to the surface and record that the chunk
    /// has data. Min-depth chunks become visible immediately so the
    /// coarsest level of detail is always present as a fallback.
    ///
    /// # Panics
    ///
    /// Panics if the chunk has been disposed: the deletion protocol
    /// guarantees a chunk outlives the application of its own build, so a
    /// stale apply here is a broken invariant.
    pub fn apply_vertex_data(&self, data: &ChunkVertexData) {
        assert!(
            !self.is_disposed(),
            "vertex data applied to disposed chunk {self}"
        );
        self.surface()
            .apply_geometry(&data.positions, &data.normals, &data.indices);
        self.has_data.store(true, Ordering::Relaxed);
        if self.root_fallback {
            self.set_ready(true);
        }
    }

    /// Whether the forge has applied geometry to this chunk at least once.
    #[must_use]
    pub fn has_vertex_data(&self) -> bool {
        self.has_data.load(Ordering::Relaxed)
    }

    /// Whether the chunk is currently visible.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    /// Show or hide the chunk's surface. Ignored after disposal.
    pub fn set_ready(&self, ready: bool) {
        if self.is_disposed() {
            return;
        }
        self.ready.store(ready, Ordering::Relaxed);
        self.surface().set_enabled(ready);
    }

    /// Release the chunk's surface.
    ///
    /// # Panics
    ///
    /// Panics on a second call: the deletion protocol disposes every chunk
    /// at most once.
    pub fn dispose(&self) {
        let already = self.disposed.swap(true, Ordering::Relaxed);
        assert!(!already, "chunk {self} disposed twice");
        self.ready.store(false, Ordering::Relaxed);
        self.surface().dispose();
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Relaxed)
    }

    /// The chunk's quadtree path.
    #[must_use]
    pub fn path(&self) -> &ChunkPath {
        &self.path
    }

    /// The face the chunk lies on.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Depth in the owning quadtree (= path length).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Centre of the chunk on the cube, planet-local.
    #[must_use]
    pub fn cube_position(&self) -> DVec3 {
        self.cube_position
    }

    /// Centre of the chunk on the projected sphere, planet-local and
    /// before the planet's own orientation.
    #[must_use]
    pub fn sphere_position(&self) -> DVec3 {
        self.sphere_position
    }
}

impl std::fmt::Display for PlanetChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.direction, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::null_surface_factory;
    use std::sync::atomic::AtomicUsize;

    /// Surface that records calls through shared counters, for observing
    /// the chunk lifecycle from outside.
    struct ProbeSurface {
        applies: Arc<AtomicUsize>,
        disposals: Arc<AtomicUsize>,
        enabled: Arc<AtomicBool>,
    }

    impl RenderSurface for ProbeSurface {
        fn apply_geometry(&mut self, _positions: &[f32], _normals: &[f32], _indices: &[u32]) {
            self.applies.fetch_add(1, Ordering::Relaxed);
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled.store(enabled, Ordering::Relaxed);
        }

        fn dispose(&mut self) {
            self.disposals.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct Probe {
        applies: Arc<AtomicUsize>,
        disposals: Arc<AtomicUsize>,
        enabled: Arc<AtomicBool>,
    }

    fn probe_factory() -> (SurfaceFactory, Probe) {
        let probe = Probe {
            applies: Arc::new(AtomicUsize::new(0)),
            disposals: Arc::new(AtomicUsize::new(0)),
            enabled: Arc::new(AtomicBool::new(true)),
        };
        let applies = Arc::clone(&probe.applies);
        let disposals = Arc::clone(&probe.disposals);
        let enabled = Arc::clone(&probe.enabled);
        let factory: SurfaceFactory = Arc::new(move || {
            Box::new(ProbeSurface {
                applies: Arc::clone(&applies),
                disposals: Arc::clone(&disposals),
                enabled: Arc::clone(&enabled),
            })
        });
        (factory, probe)
    }

    fn test_context(factory: SurfaceFactory) -> ChunkCreateContext {
        ChunkCreateContext {
            planet_name: "Test".to_string(),
            planet_diameter: 10.0,
            seed: 42,
            terrain: TerrainSettings::default(),
            resolution: 2,
            min_depth: 0,
            surface_factory: factory,
        }
    }

    fn sample_data() -> ChunkVertexData {
        ChunkVertexData {
            positions: vec![0.0; 9],
            normals: vec![0.0; 9],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_chunk_starts_hidden_and_without_data() {
        let (factory, probe) = probe_factory();
        let mut forge = ChunkForge::new(1);
        let chunk = PlanetChunk::create(
            ChunkPath::new(vec![1, 2]),
            Direction::Up,
            &mut forge,
            &test_context(factory),
        );
        assert!(!chunk.has_vertex_data());
        assert!(!chunk.is_ready());
        assert!(!probe.enabled.load(Ordering::Relaxed), "surface must start disabled");
        assert_eq!(chunk.depth(), 2);
    }

    #[test]
    fn test_create_submits_exactly_one_build_task() {
        let mut forge = ChunkForge::new(1);
        let _chunk = PlanetChunk::create(
            ChunkPath::root(),
            Direction::Forward,
            &mut forge,
            &test_context(null_surface_factory()),
        );
        assert_eq!(forge.queued_task_count(), 1);
    }

    #[test]
    fn test_apply_marks_data_and_enables_root_fallback() {
        let (factory, probe) = probe_factory();
        let mut forge = ChunkForge::new(1);
        let chunk = PlanetChunk::create(
            ChunkPath::root(),
            Direction::Down,
            &mut forge,
            &test_context(factory),
        );
        chunk.apply_vertex_data(&sample_data());
        assert!(chunk.has_vertex_data());
        assert!(chunk.is_ready(), "min-depth chunk becomes visible on apply");
        assert_eq!(probe.applies.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_apply_does_not_enable_deep_chunks() {
        let mut forge = ChunkForge::new(1);
        let chunk = PlanetChunk::create(
            ChunkPath::new(vec![0]),
            Direction::Down,
            &mut forge,
            &test_context(null_surface_factory()),
        );
        chunk.apply_vertex_data(&sample_data());
        assert!(chunk.has_vertex_data());
        assert!(!chunk.is_ready(), "deep chunks wait for their deletion group");
    }

    #[test]
    fn test_dispose_releases_surface_once() {
        let (factory, probe) = probe_factory();
        let mut forge = ChunkForge::new(1);
        let chunk = PlanetChunk::create(
            ChunkPath::root(),
            Direction::Left,
            &mut forge,
            &test_context(factory),
        );
        chunk.dispose();
        assert!(chunk.is_disposed());
        assert_eq!(probe.disposals.load(Ordering::Relaxed), 1);
    }

    #[test]
    #[should_panic(expected = "disposed twice")]
    fn test_double_dispose_panics() {
        let mut forge = ChunkForge::new(1);
        let chunk = PlanetChunk::create(
            ChunkPath::root(),
            Direction::Left,
            &mut forge,
            &test_context(null_surface_factory()),
        );
        chunk.dispose();
        chunk.dispose();
    }

    #[test]
    #[should_panic(expected = "applied to disposed chunk")]
    fn test_stale_apply_panics() {
        let mut forge = ChunkForge::new(1);
        let chunk = PlanetChunk::create(
            ChunkPath::root(),
            Direction::Right,
            &mut forge,
            &test_context(null_surface_factory()),
        );
        chunk.dispose();
        chunk.apply_vertex_data(&sample_data());
    }

    #[test]
    fn test_display_includes_direction_and_path() {
        let mut forge = ChunkForge::new(1);
        let chunk = PlanetChunk::create(
            ChunkPath::new(vec![0, 3]),
            Direction::Backward,
            &mut forge,
            &test_context(null_surface_factory()),
        );
        assert_eq!(chunk.to_string(), "BackwardP03");
    }
}
