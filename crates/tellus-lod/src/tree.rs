//! The per-face quadtree controller.
//!
//! Every tick the tree is walked and rewritten against the observer's
//! position: leaves too coarse for their target depth are split into four
//! new chunks, branches no longer warranting their depth collapse into a
//! single chunk, and every replacement is handed to the forge as a grouped
//! deletion so the old geometry survives until the new is usable.

use std::sync::Arc;

use glam::DVec3;
use tellus_cubesphere::{ChunkPath, Direction, PlanetModel, sphere_space_position};
use tellus_forge::{
    ChunkCreateContext, ChunkForge, DeleteTask, ForgeTask, PlanetChunk, SurfaceFactory,
};
use tellus_terrain::TerrainSettings;

use crate::kernel::{KernelParams, target_depth};
use crate::settings::LodSettings;

/// A node of the face quadtree: either one renderable chunk or four
/// children covering its quadrants.
pub enum QuadNode {
    /// A leaf, rendered as a single chunk.
    Leaf(Arc<PlanetChunk>),
    /// An interior node subdivided into 4 children, indexed by quadrant.
    Branch(Box<[QuadNode; 4]>),
}

impl QuadNode {
    fn for_each_chunk(&self, f: &mut impl FnMut(&Arc<PlanetChunk>)) {
        match self {
            QuadNode::Leaf(chunk) => f(chunk),
            QuadNode::Branch(children) => {
                for child in children.iter() {
                    child.for_each_chunk(f);
                }
            }
        }
    }

    fn collect_chunks(&self, out: &mut Vec<Arc<PlanetChunk>>) {
        self.for_each_chunk(&mut |chunk| out.push(Arc::clone(chunk)));
    }
}

/// LOD controller for one cube face of a planet.
pub struct ChunkTree {
    direction: Direction,
    model: PlanetModel,
    settings: LodSettings,
    kernel: KernelParams,
    chunk_ctx: ChunkCreateContext,
    root: Option<QuadNode>,
}

impl ChunkTree {
    /// Create an empty tree for one face. The root chunk is spawned on the
    /// first [`update`](Self::update).
    #[must_use]
    pub fn new(
        direction: Direction,
        model: PlanetModel,
        terrain: TerrainSettings,
        settings: LodSettings,
        surface_factory: SurfaceFactory,
    ) -> Self {
        let kernel = KernelParams {
            planet_radius: model.radius,
            max_elevation: terrain.max_elevation(),
            min_depth: settings.min_depth,
            max_depth: settings.max_depth,
            falloff: settings.falloff,
        };
        let chunk_ctx = ChunkCreateContext {
            planet_name: model.name.clone(),
            planet_diameter: model.diameter(),
            seed: model.seed,
            terrain,
            resolution: settings.resolution,
            min_depth: settings.min_depth,
            surface_factory,
        };
        Self {
            direction,
            model,
            settings,
            kernel,
            chunk_ctx,
            root: None,
        }
    }

    /// The face this tree covers.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Rewrite the tree to match the detail the observer's position
    /// warrants, submitting builds and grouped deletions to the forge.
    pub fn update(&mut self, observer_position: DVec3, forge: &mut ChunkForge) {
        let root = match self.root.take() {
            Some(node) => node,
            None => QuadNode::Leaf(self.create_chunk(ChunkPath::root(), forge)),
        };
        let updated = self.update_node(root, ChunkPath::root(), observer_position, forge);
        self.root = Some(updated);
    }

    fn update_node(
        &self,
        node: QuadNode,
        path: ChunkPath,
        observer_position: DVec3,
        forge: &mut ChunkForge,
    ) -> QuadNode {
        let depth = path.depth();
        if depth == self.settings.max_depth {
            return node;
        }

        let node_offset = sphere_space_position(
            self.model.diameter(),
            &path,
            self.direction,
            self.model.orientation,
        );
        let observer_offset = observer_position - self.model.position;
        let target = target_depth(node_offset, observer_offset, depth, &self.kernel);

        match node {
            QuadNode::Leaf(chunk) => {
                // Refine only once the current chunk is visible; a hidden
                // leaf retries next tick.
                if target > depth && chunk.is_ready() {
                    tracing::debug!(chunk = %chunk, target_depth = target, "refining leaf");
                    let new_chunks: [Arc<PlanetChunk>; 4] =
                        [0u8, 1, 2, 3].map(|q| self.create_chunk(path.child(q), forge));
                    forge.add_task(ForgeTask::Delete(DeleteTask {
                        old_chunks: vec![chunk],
                        new_chunks: new_chunks.to_vec(),
                    }));
                    QuadNode::Branch(Box::new(new_chunks.map(QuadNode::Leaf)))
                } else {
                    QuadNode::Leaf(chunk)
                }
            }
            QuadNode::Branch(children) => {
                if target <= depth && depth >= self.settings.min_depth {
                    // The whole subtree collapses into one chunk at this
                    // level.
                    let mut old_chunks = Vec::new();
                    for child in children.iter() {
                        child.collect_chunks(&mut old_chunks);
                    }
                    let chunk = self.create_chunk(path, forge);
                    tracing::debug!(chunk = %chunk, replaced = old_chunks.len(), "coarsening subtree");
                    forge.add_task(ForgeTask::Delete(DeleteTask {
                        old_chunks,
                        new_chunks: vec![Arc::clone(&chunk)],
                    }));
                    QuadNode::Leaf(chunk)
                } else {
                    let [c0, c1, c2, c3] = *children;
                    QuadNode::Branch(Box::new([
                        self.update_node(c0, path.child(0), observer_position, forge),
                        self.update_node(c1, path.child(1), observer_position, forge),
                        self.update_node(c2, path.child(2), observer_position, forge),
                        self.update_node(c3, path.child(3), observer_position, forge),
                    ]))
                }
            }
        }
    }

    fn create_chunk(&self, path: ChunkPath, forge: &mut ChunkForge) -> Arc<PlanetChunk> {
        PlanetChunk::create(path, self.direction, forge, &self.chunk_ctx)
    }

    /// Discard the whole tree and rebuild from a single root chunk; the
    /// previous chunks are retired once the new root is usable. Used when
    /// terrain parameters change.
    pub fn reset(&mut self, forge: &mut ChunkForge) {
        let mut old_chunks = Vec::new();
        if let Some(node) = self.root.take() {
            node.collect_chunks(&mut old_chunks);
        }
        let chunk = self.create_chunk(ChunkPath::root(), forge);
        if !old_chunks.is_empty() {
            forge.add_task(ForgeTask::Delete(DeleteTask {
                old_chunks,
                new_chunks: vec![Arc::clone(&chunk)],
            }));
        }
        self.root = Some(QuadNode::Leaf(chunk));
    }

    /// Run `f` on every chunk currently in the tree.
    pub fn for_each_chunk(&self, mut f: impl FnMut(&Arc<PlanetChunk>)) {
        if let Some(root) = &self.root {
            root.for_each_chunk(&mut f);
        }
    }

    /// Number of chunks currently in the tree.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        let mut count = 0;
        self.for_each_chunk(|_| count += 1);
        count
    }

    /// Number of chunks currently visible.
    #[must_use]
    pub fn ready_chunk_count(&self) -> usize {
        let mut count = 0;
        self.for_each_chunk(|chunk| {
            if chunk.is_ready() {
                count += 1;
            }
        });
        count
    }

    /// Hide and release every chunk of the tree. Only for tearing the
    /// planet down; per-chunk retirement goes through the forge.
    pub fn dispose(&mut self) {
        if let Some(root) = self.root.take() {
            root.for_each_chunk(&mut |chunk| {
                if !chunk.is_disposed() {
                    chunk.set_ready(false);
                    chunk.dispose();
                }
            });
        }
    }
}
