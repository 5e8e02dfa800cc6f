//! The six face orientations of the cube-sphere and their fixed rotations.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::{DQuat, DVec3};

/// One of the six faces of the cube that is projected onto the sphere.
///
/// Each variant carries a fixed rotation taking the canonical face plane
/// (centred on the −Z axis) into the face's orientation. `Forward` is the
/// canonical face itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    /// +Y face
    Up = 0,
    /// −Y face
    Down = 1,
    /// +X face
    Left = 2,
    /// −X face
    Right = 3,
    /// −Z face (the canonical, unrotated face)
    Forward = 4,
    /// +Z face
    Backward = 5,
}

impl Direction {
    /// All six directions in canonical order.
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Forward,
        Direction::Backward,
    ];

    /// The opposite face (e.g., `Up` → `Down`).
    #[must_use]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// The fixed rotation taking the canonical face plane into this face.
    #[must_use]
    pub fn rotation(self) -> DQuat {
        match self {
            Direction::Up => DQuat::from_rotation_x(FRAC_PI_2),
            Direction::Down => DQuat::from_rotation_x(-FRAC_PI_2),
            Direction::Left => DQuat::from_rotation_y(-FRAC_PI_2),
            Direction::Right => DQuat::from_rotation_y(FRAC_PI_2),
            Direction::Forward => DQuat::IDENTITY,
            Direction::Backward => DQuat::from_rotation_y(PI),
        }
    }

    /// Outward-pointing unit normal of this face.
    ///
    /// Equal to `rotation()` applied to −Z, the canonical face's outward axis.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            Direction::Up => DVec3::Y,
            Direction::Down => DVec3::NEG_Y,
            Direction::Left => DVec3::X,
            Direction::Right => DVec3::NEG_X,
            Direction::Forward => DVec3::NEG_Z,
            Direction::Backward => DVec3::Z,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Forward => "Forward",
            Direction::Backward => "Backward",
        };
        f.write_str(name)
    }
}
