//! The renderable-surface boundary.
//!
//! The forge fills surfaces with geometry and toggles their visibility but
//! never implements them; the host application supplies the real mesh
//! backend through [`SurfaceFactory`].

use std::sync::Arc;

/// One renderable surface patch owned by a chunk.
///
/// Implementations wrap whatever the host renderer uses for a mesh. All
/// calls arrive on the controlling thread.
pub trait RenderSurface: Send {
    /// Replace the surface's geometry with the given buffers.
    ///
    /// `positions` and `normals` hold three floats per vertex; `indices`
    /// holds three entries per triangle.
    fn apply_geometry(&mut self, positions: &[f32], normals: &[f32], indices: &[u32]);

    /// Show or hide the surface.
    fn set_enabled(&mut self, enabled: bool);

    /// Release the surface's resources. Called exactly once.
    fn dispose(&mut self);
}

/// Shared constructor creating one fresh surface per chunk.
pub type SurfaceFactory = Arc<dyn Fn() -> Box<dyn RenderSurface> + Send + Sync>;

/// A surface that goes nowhere. Used by tests and headless runs.
#[derive(Debug, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn apply_geometry(&mut self, _positions: &[f32], _normals: &[f32], _indices: &[u32]) {}

    fn set_enabled(&mut self, _enabled: bool) {}

    fn dispose(&mut self) {}
}

/// A factory producing [`NullSurface`]s.
#[must_use]
pub fn null_surface_factory() -> SurfaceFactory {
    Arc::new(|| Box::new(NullSurface))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_surface_factory_produces_fresh_surfaces() {
        let factory = null_surface_factory();
        let mut a = factory();
        let mut b = factory();
        a.apply_geometry(&[0.0; 3], &[0.0; 3], &[0]);
        a.set_enabled(true);
        a.dispose();
        b.dispose();
    }
}
