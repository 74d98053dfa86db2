//! Data the globe draws: land geometry and point-of-interest markers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::geo::topology::Topology;
use crate::geo::{Geometry, Position};

static WKT_POINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^POINT\s*\(\s*(-?[0-9]+(?:\.[0-9]+)?)\s+(-?[0-9]+(?:\.[0-9]+)?)\s*\)$")
        .expect("WKT point pattern compiles")
});

/// Property holding the text shown in the hover popover.
pub const LABEL_PROPERTY: &str = "_label";

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    /// `[lon, lat]` in degrees.
    pub position: Position,
    pub label: String,
    /// Every field of the source record except `geometry`.
    pub properties: Map<String, Value>,
}

/// Parses `POINT (lon lat)`; anything else is rejected.
pub fn parse_wkt_point(text: &str) -> Result<Position, LoadError> {
    let invalid = || LoadError::InvalidWkt(text.to_string());
    let caps = WKT_POINT.captures(text).ok_or_else(invalid)?;
    let lon = caps[1].parse::<f64>().map_err(|_| invalid())?;
    let lat = caps[2].parse::<f64>().map_err(|_| invalid())?;
    Ok([lon, lat])
}

/// Builds markers from raw records. Records without a geometry (absent,
/// null, empty, `false` or zero) are skipped; a geometry that is not a WKT
/// point fails the whole load.
pub fn markers_from_records(
    records: impl IntoIterator<Item = Map<String, Value>>,
) -> Result<Vec<Marker>, LoadError> {
    records
        .into_iter()
        .filter_map(|mut record| {
            let geometry = record.remove("geometry")?;
            let wkt = match &geometry {
                Value::Null | Value::Bool(false) => return None,
                Value::Number(n) if n.as_f64() == Some(0.0) => return None,
                Value::String(s) if s.is_empty() => return None,
                Value::String(s) => s.as_str(),
                other => return Some(Err(LoadError::InvalidWkt(other.to_string()))),
            };
            Some(parse_wkt_point(wkt).map(|position| Marker {
                position,
                label: label_of(&record),
                properties: record,
            }))
        })
        .collect()
}

pub fn markers_from_json(text: &str) -> Result<Vec<Marker>, LoadError> {
    let records: Vec<Map<String, Value>> = serde_json::from_str(text)?;
    markers_from_records(records)
}

fn label_of(record: &Map<String, Value>) -> String {
    match record.get(LABEL_PROPERTY) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Everything loaded at startup. Read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobeData {
    pub land: Geometry,
    pub markers: Vec<Marker>,
}

impl GlobeData {
    pub fn from_sources(
        markers_json: &str,
        land_json: &str,
        land_object: &str,
    ) -> Result<Self, LoadError> {
        let markers = markers_from_json(markers_json)?;
        let land = Topology::from_json(land_json)?.merged_geometry(land_object)?;
        Ok(Self { land, markers })
    }

    /// Marker positions as one geometry, in marker order.
    pub fn marker_points(&self) -> Geometry {
        Geometry::MultiPoint(self.markers.iter().map(|m| m.position).collect())
    }
}
