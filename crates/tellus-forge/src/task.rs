//! Task types crossing the forge: build requests, their results, and
//! deferred deletions.

use std::sync::Arc;

use glam::DVec3;
use tellus_cubesphere::Direction;
use tellus_terrain::TerrainSettings;

use crate::chunk::PlanetChunk;

/// Everything a worker needs to build one chunk's geometry.
///
/// Plain data, cloned onto the worker thread: a payload can be computed
/// with no reference to the tree, so later tree mutation never races a
/// build in flight.
#[derive(Clone, Debug)]
pub struct BuildPayload {
    /// Name of the planet the chunk belongs to.
    pub planet_name: String,
    /// Planet diameter in meters (the root chunk side length).
    pub planet_diameter: f64,
    /// Planet seed.
    pub seed: u64,
    /// Face the chunk lies on.
    pub direction: Direction,
    /// Depth of the chunk in its quadtree.
    pub depth: usize,
    /// Centre of the chunk on the cube, in planet-local space.
    pub cube_position: DVec3,
    /// Terrain parameters for the elevation oracle.
    pub terrain: TerrainSettings,
    /// Number of grid cells per chunk side; the vertex grid is
    /// `(resolution + 1)²`.
    pub resolution: u32,
}

/// Vertex buffers produced by a completed build.
#[derive(Clone, Debug, Default)]
pub struct ChunkVertexData {
    /// Vertex positions, three floats per vertex, relative to the chunk's
    /// sphere-space anchor.
    pub positions: Vec<f32>,
    /// Vertex normals, three floats per vertex.
    pub normals: Vec<f32>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u32>,
}

impl ChunkVertexData {
    /// Number of vertices in the buffers.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in the buffers.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A request to build geometry for one chunk.
pub struct BuildTask {
    /// The worker-side description of the work.
    pub payload: BuildPayload,
    /// The chunk that will receive the result.
    pub chunk: Arc<PlanetChunk>,
}

/// A request to retire a group of chunks once their replacements are
/// usable.
///
/// The forge resolves the group only when every chunk of `new_chunks` has
/// received vertex data (or has itself been replaced); until then every
/// chunk of `old_chunks` stays visible so the area is never uncovered.
pub struct DeleteTask {
    /// The chunks being replaced.
    pub old_chunks: Vec<Arc<PlanetChunk>>,
    /// The chunks replacing them.
    pub new_chunks: Vec<Arc<PlanetChunk>>,
}

/// A task submitted to the forge queue.
pub enum ForgeTask {
    /// Build geometry for a chunk.
    Build(BuildTask),
    /// Retire chunks after their replacements are usable. Always queued
    /// after the builds of the replacement chunks.
    Delete(DeleteTask),
}

/// A completed build waiting to be applied on the controlling thread.
pub struct ApplyTask {
    /// The generated buffers.
    pub data: ChunkVertexData,
    /// The chunk receiving the buffers.
    pub chunk: Arc<PlanetChunk>,
    /// Deletions to schedule once the buffers are applied.
    pub callbacks: Vec<DeleteTask>,
}
