//! Depth bounds and tuning knobs for the per-face quadtrees.

/// Configuration of a face quadtree.
#[derive(Clone, Debug, PartialEq)]
pub struct LodSettings {
    /// Minimum tree depth: the surface never coarsens past this level,
    /// independent of distance.
    pub min_depth: usize,
    /// Maximum tree depth: refinement stops here.
    pub max_depth: usize,
    /// Grid cells per chunk side; one chunk carries `(resolution + 1)²`
    /// vertices.
    pub resolution: u32,
    /// Strength of the kernel's log-distance falloff. Larger values
    /// coarsen more aggressively.
    pub falloff: f64,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            min_depth: 0,
            max_depth: 10,
            resolution: 64,
            falloff: 0.8,
        }
    }
}

impl LodSettings {
    /// Construct settings with explicit depth bounds.
    ///
    /// # Panics
    ///
    /// Panics if `min_depth > max_depth`.
    #[must_use]
    pub fn with_depths(min_depth: usize, max_depth: usize) -> Self {
        assert!(
            min_depth <= max_depth,
            "min_depth {min_depth} exceeds max_depth {max_depth}"
        );
        Self {
            min_depth,
            max_depth,
            ..Default::default()
        }
    }

    /// Derive the maximum depth needed so that adjacent vertices of the
    /// deepest chunks are at most `min_vertex_spacing` meters apart.
    ///
    /// # Panics
    ///
    /// Panics if any argument is not positive.
    #[must_use]
    pub fn for_planet(radius: f64, min_vertex_spacing: f64, resolution: u32) -> Self {
        assert!(radius > 0.0, "radius must be positive");
        assert!(min_vertex_spacing > 0.0, "vertex spacing must be positive");
        assert!(resolution > 0, "resolution must be positive");

        let diameter = radius * 2.0;
        let max_depth = (diameter / (min_vertex_spacing * f64::from(resolution)))
            .log2()
            .ceil()
            .max(0.0) as usize;

        Self {
            min_depth: 0,
            max_depth,
            resolution,
            falloff: 0.8,
        }
    }

    /// Number of depth levels between the bounds.
    #[must_use]
    pub fn depth_span(&self) -> usize {
        self.max_depth - self.min_depth
    }
}
