//! Cube-sphere fundamentals: the six face directions, quadtree paths, and
//! the pure geometry mapping a path to a position on the projected sphere.

mod direction;
mod geometry;
mod path;
mod planet_model;

pub use direction::Direction;
pub use geometry::{cube_space_position, plane_offset, sphere_space_position};
pub use path::ChunkPath;
pub use planet_model::PlanetModel;
