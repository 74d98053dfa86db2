//! TopoJSON decoding into standalone geometries.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Feature, Geometry, Position};
use crate::error::LoadError;

#[derive(Clone, Debug, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: HashMap<String, TopoObject>,
}

/// Quantization transform; arcs are delta-encoded when present.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum TopoObject {
    GeometryCollection {
        geometries: Vec<TopoObject>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    Point {
        coordinates: Vec<f64>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPoint {
        coordinates: Vec<Vec<f64>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    LineString {
        arcs: Vec<i64>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiLineString {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
}

impl TopoObject {
    fn meta(&self) -> (Option<&Value>, Option<&Map<String, Value>>) {
        match self {
            TopoObject::GeometryCollection { id, properties, .. }
            | TopoObject::Point { id, properties, .. }
            | TopoObject::MultiPoint { id, properties, .. }
            | TopoObject::LineString { id, properties, .. }
            | TopoObject::MultiLineString { id, properties, .. }
            | TopoObject::Polygon { id, properties, .. }
            | TopoObject::MultiPolygon { id, properties, .. } => {
                (id.as_ref(), properties.as_ref())
            }
        }
    }
}

impl Topology {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Features for the named object: one per member of a
    /// `GeometryCollection`, otherwise a single feature.
    pub fn features(&self, name: &str) -> Result<Vec<Feature>, LoadError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| LoadError::MissingObject(name.to_string()))?;
        let decoder = Decoder::new(self);
        match object {
            TopoObject::GeometryCollection { geometries, .. } => geometries
                .iter()
                .map(|g| decoder.feature(g))
                .collect(),
            other => Ok(vec![decoder.feature(other)?]),
        }
    }

    /// All geometry of the named object merged into one.
    pub fn merged_geometry(&self, name: &str) -> Result<Geometry, LoadError> {
        let geometries = self
            .features(name)?
            .into_iter()
            .filter_map(|f| f.geometry)
            .collect::<Vec<_>>();
        Ok(Geometry::GeometryCollection(geometries))
    }
}

struct Decoder {
    transform: Option<Transform>,
    arcs: Vec<Vec<Position>>,
}

impl Decoder {
    fn new(topology: &Topology) -> Self {
        let transform = topology.transform;
        let arcs: Vec<Vec<Position>> = topology
            .arcs
            .iter()
            .map(|arc| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .map(|p| {
                        let px = p.first().copied().unwrap_or(0.0);
                        let py = p.get(1).copied().unwrap_or(0.0);
                        match transform {
                            Some(t) => {
                                x += px;
                                y += py;
                                [x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]]
                            }
                            None => [px, py],
                        }
                    })
                    .collect::<Vec<Position>>()
            })
            .collect();
        Self { transform, arcs }
    }

    fn feature(&self, object: &TopoObject) -> Result<Feature, LoadError> {
        let (id, properties) = object.meta();
        Ok(Feature {
            id: id.cloned(),
            geometry: Some(self.geometry(object)?),
            properties: properties.cloned().unwrap_or_default(),
        })
    }

    fn geometry(&self, object: &TopoObject) -> Result<Geometry, LoadError> {
        Ok(match object {
            TopoObject::GeometryCollection { geometries, .. } => Geometry::GeometryCollection(
                geometries
                    .iter()
                    .map(|g| self.geometry(g))
                    .collect::<Result<_, _>>()?,
            ),
            TopoObject::Point { coordinates, .. } => Geometry::Point(self.point(coordinates)),
            TopoObject::MultiPoint { coordinates, .. } => {
                Geometry::MultiPoint(coordinates.iter().map(|c| self.point(c)).collect())
            }
            TopoObject::LineString { arcs, .. } => Geometry::LineString(self.line(arcs)?),
            TopoObject::MultiLineString { arcs, .. } => Geometry::MultiLineString(
                arcs.iter().map(|a| self.line(a)).collect::<Result<_, _>>()?,
            ),
            TopoObject::Polygon { arcs, .. } => Geometry::Polygon(self.polygon(arcs)?),
            TopoObject::MultiPolygon { arcs, .. } => Geometry::MultiPolygon(
                arcs.iter().map(|p| self.polygon(p)).collect::<Result<_, _>>()?,
            ),
        })
    }

    fn point(&self, coordinates: &[f64]) -> Position {
        let x = coordinates.first().copied().unwrap_or(0.0);
        let y = coordinates.get(1).copied().unwrap_or(0.0);
        match self.transform {
            Some(t) => [x * t.scale[0] + t.translate[0], y * t.scale[1] + t.translate[1]],
            None => [x, y],
        }
    }

    /// Joins the referenced arcs; a shared endpoint is emitted once.
    fn stitch(&self, refs: &[i64]) -> Result<Vec<Position>, LoadError> {
        let mut points: Vec<Position> = Vec::new();
        for &r in refs {
            let (index, reversed) = if r < 0 { (!r, true) } else { (r, false) };
            let arc = usize::try_from(index)
                .ok()
                .and_then(|i| self.arcs.get(i))
                .ok_or(LoadError::ArcOutOfRange(r))?;
            points.pop();
            if reversed {
                points.extend(arc.iter().rev());
            } else {
                points.extend(arc.iter());
            }
        }
        Ok(points)
    }

    fn line(&self, refs: &[i64]) -> Result<Vec<Position>, LoadError> {
        let mut points = self.stitch(refs)?;
        if points.len() < 2 {
            if let Some(&first) = points.first() {
                points.push(first);
            }
        }
        Ok(points)
    }

    fn ring(&self, refs: &[i64]) -> Result<Vec<Position>, LoadError> {
        let mut points = self.stitch(refs)?;
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Vec<Vec<Position>>, LoadError> {
        rings.iter().map(|r| self.ring(r)).collect()
    }
}
