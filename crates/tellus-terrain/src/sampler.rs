//! Layered fractal-noise elevation sampler.
//!
//! Three seeded simplex layers — continents, mountains, bumps — where the
//! continent layer masks the mountains so ranges only rise on land. The
//! sampler is a pure function of `(settings, seed)`: two samplers built
//! from the same inputs return identical values forever.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

use crate::TerrainSettings;

/// Step used for the central-difference gradient, in unit-sphere units.
const GRADIENT_EPSILON: f64 = 1e-5;

/// Evaluates terrain elevation (and its gradient) at points on the unit
/// sphere.
pub struct TerrainSampler {
    settings: TerrainSettings,
    continents: Simplex,
    mountains: Simplex,
    bumps: Simplex,
}

impl TerrainSampler {
    /// Build a sampler for the given settings and planet seed.
    #[must_use]
    pub fn new(settings: TerrainSettings, seed: u64) -> Self {
        let base = seed as u32;
        Self {
            settings,
            continents: Simplex::new(base),
            mountains: Simplex::new(base.wrapping_add(0x9E37_79B9)),
            bumps: Simplex::new(base.wrapping_add(0x3C6E_F372)),
        }
    }

    /// Elevation above the base sphere at a point on the unit sphere,
    /// in meters. Bounded by `±settings.max_elevation()`.
    #[must_use]
    pub fn elevation(&self, unit_point: DVec3) -> f64 {
        let s = &self.settings;

        // Continent shelf in [-1, 1]; positive values are land.
        let continent = fbm(&self.continents, unit_point * s.continents_frequency, 4);

        // Land mask in [0, 1]; fragmentation shifts the shoreline.
        let shoreline = 1.0 - 2.0 * s.continents_fragmentation;
        let land = ((continent - shoreline) * 0.5 + 0.5).clamp(0.0, 1.0);

        // Ridged mountains only rise where the mask is open.
        let ridges = fbm(&self.mountains, unit_point * s.mountains_frequency, 6).abs();

        let bumps = fbm(&self.bumps, unit_point * s.bumps_frequency, 2);

        continent * s.continent_base_height
            + land * ridges * s.max_mountain_height
            + bumps * s.max_bump_height
    }

    /// The terrain oracle: elevation plus its spatial gradient at a point
    /// on the unit sphere.
    ///
    /// The gradient is taken by central differences in the ambient 3D
    /// space, so it is exactly as deterministic as [`elevation`].
    ///
    /// [`elevation`]: Self::elevation
    #[must_use]
    pub fn elevation_and_gradient(&self, unit_point: DVec3) -> (f64, DVec3) {
        let elevation = self.elevation(unit_point);
        let gradient = DVec3::new(
            self.difference(unit_point, DVec3::X),
            self.difference(unit_point, DVec3::Y),
            self.difference(unit_point, DVec3::Z),
        );
        (elevation, gradient)
    }

    fn difference(&self, point: DVec3, axis: DVec3) -> f64 {
        let ahead = self.elevation(point + axis * GRADIENT_EPSILON);
        let behind = self.elevation(point - axis * GRADIENT_EPSILON);
        (ahead - behind) / (2.0 * GRADIENT_EPSILON)
    }

    /// The settings this sampler was built from.
    #[must_use]
    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }
}

/// Fractal Brownian motion normalized to [-1, 1].
fn fbm(noise: &Simplex, point: DVec3, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_amplitude = 0.0;

    for _ in 0..octaves {
        let p = point * frequency;
        total += noise.get([p.x, p.y, p.z]) * amplitude;
        max_amplitude += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    total / max_amplitude
}
