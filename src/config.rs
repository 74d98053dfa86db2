use serde::{Deserialize, Serialize};

use crate::geo::Rotation;

/// Id of the optional inline `<script type="application/json">` element
/// overriding the defaults.
pub const CONFIG_ELEMENT_ID: &str = "globe-config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub markers_url: String,
    pub land_url: String,
    /// Name of the topology object holding the landmasses.
    pub land_object: String,
    pub initial_rotation: Rotation,
    /// Gap in pixels between the sphere and the canvas edge.
    pub margin: f64,
    pub point_radius: f64,
    pub hover_radius: f64,
    pub sphere_fill: String,
    pub land_fill: String,
    pub sphere_stroke: String,
    pub marker_fill: String,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            markers_url: "data/places.json".to_string(),
            land_url: "data/land-110m.json".to_string(),
            land_object: "land".to_string(),
            initial_rotation: [-110.0, 0.0, 0.0],
            margin: 1.0,
            point_radius: 5.0,
            hover_radius: 5.0,
            sphere_fill: "#fff".to_string(),
            land_fill: "#000".to_string(),
            sphere_stroke: "#000".to_string(),
            marker_fill: "grey".to_string(),
        }
    }
}

impl GlobeConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads the inline config element, falling back to defaults when it is
    /// missing or unreadable.
    pub fn from_document() -> Self {
        let Some(text) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content())
        else {
            return Self::default();
        };
        match Self::from_json(&text) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {err}");
                Self::default()
            }
        }
    }
}
