//! Pure functions mapping a quadtree path to positions on the cube and on
//! the projected sphere.
//!
//! These must be deterministic and independent of any tree state: LOD
//! decisions and chunk placement both rely on repeated calls returning
//! bit-identical results.

use glam::{DQuat, DVec2, DVec3};

use crate::{ChunkPath, Direction};

/// Offset of a node's centre within the face plane, relative to the face
/// centre.
///
/// Each path element at index `i` contributes an offset of
/// `root_length / 2^(i+2)` in ±x/±y depending on the quadrant, which
/// recursively centres each child within its parent.
#[must_use]
pub fn plane_offset(root_length: f64, path: &ChunkPath) -> DVec2 {
    let mut offset = DVec2::ZERO;
    for (i, &quadrant) in path.segments().iter().enumerate() {
        let step = root_length / f64::powi(2.0, i as i32 + 2);
        let (sx, sy) = match quadrant {
            0 => (-1.0, -1.0),
            1 => (1.0, -1.0),
            2 => (1.0, 1.0),
            3 => (-1.0, 1.0),
            _ => unreachable!("ChunkPath only stores quadrants 0..4"),
        };
        offset.x += sx * step;
        offset.y += sy * step;
    }
    offset
}

/// Position of a node's centre on the cube, in planet-local space.
///
/// The face plane sits at `z = −root_length / 2` and is rotated into place
/// by the direction's fixed rotation.
#[must_use]
pub fn cube_space_position(root_length: f64, path: &ChunkPath, direction: Direction) -> DVec3 {
    let offset = plane_offset(root_length, path);
    let on_face = DVec3::new(offset.x, offset.y, -root_length * 0.5);
    direction.rotation() * on_face
}

/// Position of a node's centre on the projected sphere.
///
/// The cube position is normalized onto the unit sphere, scaled to the
/// sphere radius (`root_length / 2`), then rotated by the planet's own
/// orientation.
#[must_use]
pub fn sphere_space_position(
    root_length: f64,
    path: &ChunkPath,
    direction: Direction,
    planet_orientation: DQuat,
) -> DVec3 {
    let cube = cube_space_position(root_length, path, direction);
    planet_orientation * (cube.normalize() * (root_length * 0.5))
}
