use crate::geo::Projection;
use crate::model::Marker;

/// Marker under the pointer and where it sits on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverHit<'a> {
    pub x: f64,
    pub y: f64,
    pub marker: &'a Marker,
}

/// First marker, in list order, whose projection lies strictly within
/// `radius` pixels of `pointer`. Markers on the far hemisphere never match.
pub fn hit_test<'a>(
    projection: &Projection,
    markers: &'a [Marker],
    pointer: [f64; 2],
    radius: f64,
) -> Option<HoverHit<'a>> {
    let radius_sq = radius * radius;
    markers.iter().find_map(|marker| {
        let [x, y] = projection.project(marker.position)?;
        let dx = pointer[0] - x;
        let dy = pointer[1] - y;
        (dx * dx + dy * dy < radius_sq).then_some(HoverHit { x, y, marker })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn globe() -> Projection {
        Projection::new()
            .fit_extent([[1.0, 1.0], [599.0, 599.0]])
            .with_rotation([-110.0, 0.0, 0.0])
    }

    fn marker(lon: f64, lat: f64, label: &str) -> Marker {
        Marker {
            position: [lon, lat],
            label: label.to_string(),
            properties: Map::new(),
        }
    }

    #[test]
    fn radius_boundary_is_exclusive() {
        let p = globe();
        let markers = [marker(110.0, 0.0, "center")];
        assert_eq!(hit_test(&p, &markers, [305.0, 300.0], 5.0), None);
        assert_eq!(hit_test(&p, &markers, [300.0, 295.0], 5.0), None);
        let hit = hit_test(&p, &markers, [304.999, 300.0], 5.0).unwrap();
        assert_eq!(hit.marker.label, "center");
        assert_eq!((hit.x, hit.y), (300.0, 300.0));
    }

    #[test]
    fn first_marker_in_list_wins() {
        let p = globe();
        let near_lon = 110.0 + (3.0f64 / 299.0).asin().to_degrees();
        let markers = [marker(110.0, 0.0, "first"), marker(near_lon, 0.0, "nearer")];
        let hit = hit_test(&p, &markers, [303.0, 300.0], 5.0).unwrap();
        assert_eq!(hit.marker.label, "first");

        let reversed = [markers[1].clone(), markers[0].clone()];
        let hit = hit_test(&p, &reversed, [303.0, 300.0], 5.0).unwrap();
        assert_eq!(hit.marker.label, "nearer");
    }

    #[test]
    fn hidden_markers_are_skipped() {
        let p = globe();
        // antipode of the view center; without clipping it would land on (300, 300)
        let markers = [marker(-70.0, 0.0, "behind"), marker(110.0, 1.0, "front")];
        assert_eq!(hit_test(&p, &markers[..1], [300.0, 300.0], 5.0), None);
        let hit = hit_test(&p, &markers, [300.0, 296.0], 5.0).unwrap();
        assert_eq!(hit.marker.label, "front");
    }

    #[test]
    fn empty_list_never_matches() {
        assert_eq!(hit_test(&globe(), &[], [300.0, 300.0], 5.0), None);
    }
}
