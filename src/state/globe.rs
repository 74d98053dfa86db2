use crate::config::GlobeConfig;
use crate::geo::Projection;

/// Shared projection state of the globe view. Owned by the view; the
/// gesture code only borrows the projection.
#[derive(Debug, Clone)]
pub struct GlobeState {
    pub projection: Projection,
    pub width: f64,
    pub height: f64,
}

impl GlobeState {
    /// Square surface of `width` pixels with the sphere fitted inside the
    /// configured margin.
    pub fn new(width: f64, config: &GlobeConfig) -> Self {
        let mut state = Self {
            projection: Projection::new().with_rotation(config.initial_rotation),
            width: 0.0,
            height: 0.0,
        };
        state.resize(width, config.margin);
        state
    }

    /// Refits the sphere to a new width, keeping the rotation.
    pub fn resize(&mut self, width: f64, margin: f64) {
        let width = width.max(0.0);
        self.width = width;
        self.height = width;
        self.projection = self
            .projection
            .fit_extent([[margin, margin], [width - margin, width - margin]]);
    }
}
