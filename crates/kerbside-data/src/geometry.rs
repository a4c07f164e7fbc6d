//! Reduction of GeoJSON geometries to a single representative point.
//!
//! Lot outlines arrive as polygons; the index wants one (lat, lon) per
//! record. Polygons reduce to the signed-area-weighted centroid of their
//! outer ring (shoelace formula), falling back to the vertex mean when the
//! ring is numerically degenerate. MultiPolygons reduce via the first
//! polygon's outer ring only — geographically arbitrary but deterministic,
//! and downstream ranking depends on this exact rule. Malformed geometries
//! reduce to `None`; loaders skip those records.

use serde_json::Value;

/// Signed areas below this are treated as degenerate (collinear rings,
/// repeated points).
const AREA_EPSILON: f64 = 1e-12;

/// Reduce a GeoJSON geometry object to a `(lat, lon)` pair.
///
/// Supports `Point`, `Polygon`, and `MultiPolygon`. Note the coordinate
/// order flip: GeoJSON carries `[lon, lat]`.
#[must_use]
pub fn reduce_to_point(geometry: &Value) -> Option<(f64, f64)> {
    let gtype = geometry.get("type")?.as_str()?;
    let coords = geometry.get("coordinates")?;

    match gtype {
        "Point" => {
            let pair = coords.as_array()?;
            let lon = pair.first()?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            Some((lat, lon))
        }
        "Polygon" => outer_ring_centroid(coords),
        // First polygon wins; sub-polygon areas are not weighted.
        "MultiPolygon" => outer_ring_centroid(coords.as_array()?.first()?),
        _ => None,
    }
}

/// Centroid of the outer (first) ring of a polygon coordinate array,
/// returned as `(lat, lon)`.
fn outer_ring_centroid(polygon: &Value) -> Option<(f64, f64)> {
    let outer = polygon.as_array()?.first()?;
    let ring = parse_ring(outer);
    if ring.len() < 3 {
        return None;
    }
    ring_centroid(&ring).map(|(lon, lat)| (lat, lon))
}

/// Parse a ring into `(lon, lat)` pairs, dropping malformed vertices.
fn parse_ring(ring: &Value) -> Vec<(f64, f64)> {
    let Some(points) = ring.as_array() else {
        return Vec::new();
    };
    points
        .iter()
        .filter_map(|p| {
            let pair = p.as_array()?;
            let lon = pair.first()?.as_f64()?;
            let lat = pair.get(1)?.as_f64()?;
            Some((lon, lat))
        })
        .collect()
}

/// Shoelace centroid of a ring in `(x, y)` = `(lon, lat)` space.
///
/// Works in raw degree space, which is fine for lot-sized areas. When the
/// doubled signed area is below [`AREA_EPSILON`], falls back to the
/// arithmetic mean of the vertices.
fn ring_centroid(ring: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for pair in ring.windows(2) {
        let (x1, y1) = pair[0];
        let (x2, y2) = pair[1];
        let cross = x1 * y2 - x2 * y1;
        area2 += cross;
        cx += (x1 + x2) * cross;
        cy += (y1 + y2) * cross;
    }

    if area2.abs() < AREA_EPSILON {
        let n = ring.len();
        if n == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = n as f64;
        let mean_x = ring.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_y = ring.iter().map(|p| p.1).sum::<f64>() / n;
        return Some((mean_x, mean_y));
    }

    Some((cx / (3.0 * area2), cy / (3.0 * area2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn point_passes_through_with_axes_flipped() {
        let geom = json!({ "type": "Point", "coordinates": [-76.48, 44.23] });
        assert_eq!(reduce_to_point(&geom), Some((44.23, -76.48)));
    }

    #[test]
    fn unit_square_centroid_is_its_middle() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
        });
        let (lat, lon) = reduce_to_point(&geom).expect("centroid");
        assert!((lon - 0.5).abs() < 1e-12);
        assert!((lat - 0.5).abs() < 1e-12);
    }

    #[test]
    fn asymmetric_polygon_centroid_stays_in_bounding_box() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[
                [-76.50, 44.20], [-76.40, 44.21], [-76.42, 44.30],
                [-76.49, 44.27], [-76.50, 44.20]
            ]]
        });
        let (lat, lon) = reduce_to_point(&geom).expect("centroid");
        assert!((-76.50..=-76.40).contains(&lon), "lon {lon} out of bbox");
        assert!((44.20..=44.30).contains(&lat), "lat {lat} out of bbox");
    }

    #[test]
    fn collinear_ring_falls_back_to_vertex_mean() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [0.0, 0.0]]]
        });
        let (lat, lon) = reduce_to_point(&geom).expect("mean fallback");
        assert!((lon - 0.75).abs() < 1e-12, "lon {lon}");
        assert!((lat - 0.75).abs() < 1e-12, "lat {lat}");
    }

    #[test]
    fn multipolygon_uses_first_polygon_only() {
        let geom = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]],
                [[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 11.0], [10.0, 10.0]]]
            ]
        });
        let (lat, lon) = reduce_to_point(&geom).expect("centroid");
        assert!((lon - 0.5).abs() < 1e-12);
        assert!((lat - 0.5).abs() < 1e-12);
    }

    #[test]
    fn malformed_geometries_reduce_to_none() {
        for geom in [
            json!({ "type": "Polygon" }),
            json!({ "coordinates": [[0.0, 0.0]] }),
            json!({ "type": "Point", "coordinates": [1.0] }),
            json!({ "type": "Point", "coordinates": ["a", "b"] }),
            json!({ "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 1.0]]] }),
            json!({ "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] }),
            json!({ "type": "MultiPolygon", "coordinates": [] }),
        ] {
            assert_eq!(reduce_to_point(&geom), None, "geometry: {geom}");
        }
    }

    #[test]
    fn non_numeric_vertices_are_dropped_before_the_arity_check() {
        // Two valid vertices remain after dropping junk: below the 3-point
        // minimum, so the whole geometry is rejected.
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], ["x", 1.0], [1.0, 1.0], [0.0, 0.0]]]
        });
        let reduced = reduce_to_point(&geom).expect("three valid vertices remain");
        // (0,0), (1,1), (0,0) is degenerate: mean fallback.
        assert!((reduced.0 - (0.0 + 1.0 + 0.0) / 3.0).abs() < 1e-12);
    }
}
