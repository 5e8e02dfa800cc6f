//! Chunk forge: background mesh generation for planet chunks.
//!
//! A [`ChunkForge`] turns queued build requests into jobs on a bounded
//! [`WorkerPool`], collects the resulting vertex buffers into apply
//! operations executed on the controlling thread, and retires replaced
//! chunks through grouped deferred deletion so the surface never shows a
//! hole while geometry is swapped.

mod chunk;
mod forge;
mod generator;
mod surface;
mod task;
mod worker_pool;

pub use chunk::{ChunkCreateContext, PlanetChunk};
pub use forge::ChunkForge;
pub use generator::generate_chunk_geometry;
pub use surface::{NullSurface, RenderSurface, SurfaceFactory, null_surface_factory};
pub use task::{ApplyTask, BuildPayload, BuildTask, ChunkVertexData, DeleteTask, ForgeTask};
pub use worker_pool::{WorkerPool, WorkerReply};
