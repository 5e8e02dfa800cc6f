//! Planet model — the immutable parameters of one planet.

use glam::{DQuat, DVec3};

/// Immutable description of a planet.
///
/// Runtime state (quadtrees, in-flight builds, surfaces) lives elsewhere;
/// this is only the specification the terrain pipeline derives from.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetModel {
    /// Human-readable name (e.g., "Terra").
    pub name: String,
    /// Radius of the base sphere in meters, before terrain displacement.
    pub radius: f64,
    /// Seed for all procedural generation on this planet.
    pub seed: u64,
    /// Centre position in world space (meters).
    pub position: DVec3,
    /// The planet's own orientation.
    pub orientation: DQuat,
}

impl PlanetModel {
    /// Construct a planet model at the world origin with identity
    /// orientation.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not strictly positive and finite.
    pub fn new(name: impl Into<String>, radius: f64, seed: u64) -> Self {
        assert!(
            radius.is_finite() && radius > 0.0,
            "planet radius must be positive and finite, got {radius}"
        );
        Self {
            name: name.into(),
            radius,
            seed,
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Earth-like preset (radius 6,371 km).
    pub fn earth_like(name: impl Into<String>, seed: u64) -> Self {
        Self::new(name, 6_371_000.0, seed)
    }

    /// Moon-like preset (radius 1,737.4 km).
    pub fn moon_like(name: impl Into<String>, seed: u64) -> Self {
        Self::new(name, 1_737_400.0, seed)
    }

    /// Move the planet to the given world position.
    #[must_use]
    pub fn at_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    /// Give the planet the given orientation.
    #[must_use]
    pub fn with_orientation(mut self, orientation: DQuat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Diameter of the base sphere — the side length of the root chunk of
    /// each face quadtree.
    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diameter_is_twice_radius() {
        let planet = PlanetModel::new("Test", 5.0, 1);
        assert_eq!(planet.diameter(), 10.0);
    }

    #[test]
    fn test_presets() {
        let earth = PlanetModel::earth_like("Terra", 42);
        assert_eq!(earth.radius, 6_371_000.0);
        let moon = PlanetModel::moon_like("Luna", 7);
        assert_eq!(moon.radius, 1_737_400.0);
    }

    #[test]
    fn test_defaults_to_origin() {
        let planet = PlanetModel::new("Test", 1.0, 0);
        assert_eq!(planet.position, DVec3::ZERO);
        assert_eq!(planet.orientation, DQuat::IDENTITY);
    }

    #[test]
    fn test_builder_setters() {
        let planet = PlanetModel::new("Test", 1.0, 0)
            .at_position(DVec3::new(1.0, 2.0, 3.0))
            .with_orientation(DQuat::from_rotation_x(0.5));
        assert_eq!(planet.position, DVec3::new(1.0, 2.0, 3.0));
        assert!((planet.orientation.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_radius_panics() {
        PlanetModel::new("Bad", 0.0, 1);
    }
}
