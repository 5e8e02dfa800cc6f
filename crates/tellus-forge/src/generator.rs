//! The worker body: turn a build payload into vertex buffers.

use glam::DVec3;
use tellus_terrain::TerrainSampler;

use crate::task::{BuildPayload, ChunkVertexData};

/// Build the vertex grid for one chunk.
///
/// A `(resolution + 1)²` grid is laid over the chunk's square on the face
/// plane, rotated onto the cube, projected to the sphere and displaced by
/// the terrain oracle. Positions are emitted relative to the chunk's
/// sphere-space anchor so the f32 buffers keep precision at planet radii.
///
/// Pure function of the payload: identical payloads produce identical
/// buffers on any thread.
#[must_use]
pub fn generate_chunk_geometry(payload: &BuildPayload) -> ChunkVertexData {
    assert!(payload.resolution > 0, "chunk resolution must be at least 1");

    let sampler = TerrainSampler::new(payload.terrain.clone(), payload.seed);
    let cells = payload.resolution as usize;
    let verts_per_row = cells + 1;
    let radius = payload.planet_diameter * 0.5;
    let chunk_length = payload.planet_diameter / f64::powi(2.0, payload.depth as i32);
    let rotation = payload.direction.rotation();
    let anchor = payload.cube_position.normalize() * radius;

    let vertex_count = verts_per_row * verts_per_row;
    let mut positions = Vec::with_capacity(vertex_count * 3);
    let mut normals = Vec::with_capacity(vertex_count * 3);

    for x in 0..verts_per_row {
        for y in 0..verts_per_row {
            let local = DVec3::new(
                (x as f64 / cells as f64 - 0.5) * chunk_length,
                (y as f64 / cells as f64 - 0.5) * chunk_length,
                0.0,
            );
            let cube_point = payload.cube_position + rotation * local;
            let unit = cube_point.normalize();

            let (elevation, gradient) = sampler.elevation_and_gradient(unit);
            let vertex = unit * (radius + elevation) - anchor;
            positions.push(vertex.x as f32);
            positions.push(vertex.y as f32);
            positions.push(vertex.z as f32);

            // Surface normal of p ↦ p·(R + h(p)): radial direction tilted
            // by the tangential part of the elevation gradient.
            let tangential = gradient - unit * gradient.dot(unit);
            let normal = (unit - tangential / (radius + elevation)).normalize();
            normals.push(normal.x as f32);
            normals.push(normal.y as f32);
            normals.push(normal.z as f32);
        }
    }

    let mut indices = Vec::with_capacity(cells * cells * 6);
    for x in 0..cells {
        for y in 0..cells {
            let a = (x * verts_per_row + y) as u32;
            let b = a + 1;
            let c = ((x + 1) * verts_per_row + y + 1) as u32;
            let d = ((x + 1) * verts_per_row + y) as u32;
            indices.extend_from_slice(&[a, b, c]);
            indices.extend_from_slice(&[a, c, d]);
        }
    }

    ChunkVertexData {
        positions,
        normals,
        indices,
    }
}
