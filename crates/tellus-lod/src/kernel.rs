//! The detail kernel: how deep should the quadtree resolve a given node?
//!
//! Two independent factors push detail down — the great-circle distance
//! between the node and the observer (penalized relative to the node's
//! angular footprint) and the observer's altitude above the terrain
//! envelope. Both are log-scaled and subtracted from the maximum depth, so
//! the target is continuous and monotonic in distance.

use glam::DVec3;

/// How many node lengths of great-circle slack a node gets before the
/// angular factor starts coarsening it.
const GREAT_CIRCLE_MARGIN: f64 = 8.0;

/// Planet-wide inputs of the detail kernel.
#[derive(Clone, Debug)]
pub struct KernelParams {
    /// Planet radius in meters.
    pub planet_radius: f64,
    /// Largest possible terrain displacement above the base sphere.
    pub max_elevation: f64,
    /// Depth floor of the owning tree.
    pub min_depth: usize,
    /// Depth ceiling of the owning tree.
    pub max_depth: usize,
    /// Strength of the log falloff.
    pub falloff: f64,
}

impl KernelParams {
    /// Altitude at which the observer counts as "on the surface": the base
    /// sphere plus half the terrain envelope.
    fn elevation_envelope(&self) -> f64 {
        self.planet_radius + self.max_elevation * 0.5
    }
}

/// Target depth for a node, from its offset and the observer's offset to
/// the planet centre (both in world orientation).
///
/// The result is clamped to `[min_depth, max_depth]`. Strictly decreasing
/// thresholds with depth follow from the node-length term of the angular
/// margin.
#[must_use]
pub fn target_depth(
    node_offset: DVec3,
    observer_offset: DVec3,
    depth: usize,
    params: &KernelParams,
) -> usize {
    let observer_distance = observer_offset.length();
    if observer_distance == 0.0 {
        // Observer at the planet centre; every direction is equally close.
        return params.max_depth;
    }

    let node_direction = node_offset.normalize();
    let observer_direction = observer_offset / observer_distance;

    let great_circle = node_direction
        .dot(observer_direction)
        .clamp(-1.0, 1.0)
        .acos();
    let node_length = (params.planet_radius * 2.0) / f64::powi(2.0, depth as i32);
    let angular_margin =
        GREAT_CIRCLE_MARGIN * node_length / (std::f64::consts::TAU * params.planet_radius);
    let great_circle_factor = (great_circle - angular_margin).max(0.0);

    let altitude_factor =
        (observer_distance - params.elevation_envelope()).max(0.0) / params.planet_radius;

    let boost = f64::powi(2.0, (params.max_depth - params.min_depth) as i32);
    let mut kernel = params.max_depth as f64;
    kernel -= (1.0 + great_circle_factor * boost).log2() * params.falloff;
    kernel -= (1.0 + altitude_factor * boost).log2() * params.falloff;

    (kernel.floor() as isize)
        .clamp(params.min_depth as isize, params.max_depth as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f64 = 1_000.0;

    fn params() -> KernelParams {
        KernelParams {
            planet_radius: RADIUS,
            max_elevation: 10.0,
            min_depth: 0,
            max_depth: 6,
            falloff: 0.8,
        }
    }

    #[test]
    fn test_observer_on_surface_wants_max_depth() {
        let p = params();
        let node = DVec3::Y * RADIUS;
        let observer = DVec3::Y * RADIUS;
        assert_eq!(target_depth(node, observer, 3, &p), p.max_depth);
    }

    #[test]
    fn test_far_observer_wants_min_depth() {
        let p = params();
        let node = DVec3::Y * RADIUS;
        let observer = DVec3::Y * (RADIUS * 200.0);
        assert_eq!(target_depth(node, observer, 0, &p), p.min_depth);
    }

    #[test]
    fn test_antipode_wants_min_depth() {
        let p = params();
        let node = DVec3::Y * RADIUS;
        let observer = DVec3::NEG_Y * RADIUS;
        assert_eq!(target_depth(node, observer, 4, &p), p.min_depth);
    }

    #[test]
    fn test_monotonic_in_altitude() {
        let p = params();
        let node = DVec3::Y * RADIUS;
        let mut previous = p.max_depth;
        for step in 1..40 {
            let altitude = RADIUS * (1.0 + step as f64 * 0.25);
            let target = target_depth(node, DVec3::Y * altitude, 2, &p);
            assert!(
                target <= previous,
                "target depth increased with altitude: {previous} -> {target}"
            );
            previous = target;
        }
    }

    #[test]
    fn test_monotonic_in_great_circle_distance() {
        let p = params();
        let observer = DVec3::Y * RADIUS;
        let mut previous = p.max_depth;
        for step in 0..=32 {
            let angle = std::f64::consts::PI * step as f64 / 32.0;
            let node = DVec3::new(angle.sin(), angle.cos(), 0.0) * RADIUS;
            let target = target_depth(node, observer, 3, &p);
            assert!(
                target <= previous,
                "target depth increased with angle: {previous} -> {target}"
            );
            previous = target;
        }
    }

    #[test]
    fn test_result_is_clamped() {
        let p = params();
        let node = DVec3::Y * RADIUS;
        for altitude_factor in [1.0, 2.0, 10.0, 1_000.0] {
            let target = target_depth(node, DVec3::Y * (RADIUS * altitude_factor), 1, &p);
            assert!((p.min_depth..=p.max_depth).contains(&target));
        }
    }

    #[test]
    fn test_observer_at_centre_is_handled() {
        let p = params();
        let node = DVec3::Y * RADIUS;
        assert_eq!(target_depth(node, DVec3::ZERO, 0, &p), p.max_depth);
    }

    #[test]
    fn test_deterministic() {
        let p = params();
        let node = DVec3::new(0.3, 0.8, -0.52).normalize() * RADIUS;
        let observer = DVec3::new(100.0, 1_400.0, 250.0);
        let a = target_depth(node, observer, 2, &p);
        let b = target_depth(node, observer, 2, &p);
        assert_eq!(a, b);
    }
}
