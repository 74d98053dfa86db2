//! Spherical geometry: versors, the orthographic projection, path streaming
//! and topology decoding.

pub mod path;
pub mod projection;
pub mod topology;
pub mod versor;

use serde_json::{Map, Value};

pub use path::{GeoPath, PathSink};
pub use projection::Projection;

/// `[λ, φ, γ]` in degrees.
pub type Rotation = [f64; 3];

pub type Vec3 = [f64; 3];

/// `[lon, lat]` in degrees.
pub type Position = [f64; 2];

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// The whole sphere; renders as the projection outline.
    Sphere,
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    /// Exterior ring first, then holes. Rings are closed.
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<Geometry>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub id: Option<Value>,
    pub geometry: Option<Geometry>,
    pub properties: Map<String, Value>,
}
