//! Drawing the globe. Order matters: sphere fill, land, sphere outline,
//! then markers on top, each as a fresh path.

use web_sys::CanvasRenderingContext2d;

use crate::config::GlobeConfig;
use crate::geo::{GeoPath, Geometry, PathSink};
use crate::model::GlobeData;
use crate::state::GlobeState;

/// A 2D drawing surface.
pub trait Surface: PathSink {
    fn clear(&mut self, width: f64, height: f64);
    fn begin_path(&mut self);
    fn fill(&mut self, style: &str);
    fn stroke(&mut self, style: &str);
}

pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    state: &GlobeState,
    data: &GlobeData,
    config: &GlobeConfig,
) {
    let path = GeoPath::new(&state.projection).point_radius(config.point_radius);
    surface.clear(state.width, state.height);

    surface.begin_path();
    path.geometry(&Geometry::Sphere, surface);
    surface.fill(&config.sphere_fill);

    surface.begin_path();
    path.geometry(&data.land, surface);
    surface.fill(&config.land_fill);

    surface.begin_path();
    path.geometry(&Geometry::Sphere, surface);
    surface.stroke(&config.sphere_stroke);

    surface.begin_path();
    path.geometry(&data.marker_points(), surface);
    surface.fill(&config.marker_fill);
}

/// [`Surface`] over a canvas 2D context.
pub struct CanvasSurface<'a>(pub &'a CanvasRenderingContext2d);

impl PathSink for CanvasSurface<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.0.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.0.arc(x, y, radius, start, end).ok();
    }

    fn close_path(&mut self) {
        self.0.close_path();
    }
}

impl Surface for CanvasSurface<'_> {
    fn clear(&mut self, width: f64, height: f64) {
        self.0.clear_rect(0.0, 0.0, width, height);
    }

    fn begin_path(&mut self) {
        self.0.begin_path();
    }

    fn fill(&mut self, style: &str) {
        self.0.set_fill_style_str(style);
        self.0.fill();
    }

    fn stroke(&mut self, style: &str) {
        self.0.set_stroke_style_str(style);
        self.0.stroke();
    }
}
