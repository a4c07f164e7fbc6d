//! Dataset loading for spots and lots.
//!
//! Two shapes: a spot-centric dataset (CSV, flat JSON list, or GeoJSON
//! FeatureCollection) normalized through the alias tables, and the
//! Kingston lot-area GeoJSON with its fixed municipal property names.
//! File-level problems surface as [`DataError`]; individual malformed
//! records are skipped silently so one bad row never poisons a load.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use kerbside_core::models::{ParkingLot, ParkingSpot};

use crate::aliases::{
    field_f64, field_i64, field_string, ADDRESS_ALIASES, DESCRIPTION_ALIASES, ID_ALIASES,
    LAT_ALIASES, LON_ALIASES, RULES_ALIASES, TYPE_ALIASES,
};
use crate::geometry::reduce_to_point;
use crate::DataError;

/// Load the spot-centric dataset, dispatching on the file extension.
///
/// # Errors
///
/// [`DataError::Io`] when the file cannot be read,
/// [`DataError::UnsupportedExtension`] for unknown extensions, and the
/// parse errors of the underlying format.
pub fn load_spots(path: &Path) -> Result<Vec<ParkingSpot>, DataError> {
    let display = path.display().to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => {
            let file = fs::File::open(path).map_err(|source| DataError::Io {
                path: display.clone(),
                source,
            })?;
            parse_spots_csv(file, &display)
        }
        "json" | "geojson" => {
            let text = fs::read_to_string(path).map_err(|source| DataError::Io {
                path: display.clone(),
                source,
            })?;
            parse_spots_json(&text, &display)
        }
        _ => Err(DataError::UnsupportedExtension { path: display }),
    }
}

/// Load the lot-area GeoJSON.
///
/// # Errors
///
/// [`DataError::Io`] / [`DataError::Json`] on file-level problems.
pub fn load_lots(path: &Path) -> Result<Vec<ParkingLot>, DataError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: display.clone(),
        source,
    })?;
    parse_lots_geojson(&text, &display)
}

/// Parse a CSV spot dataset. Each record becomes an alias-table row.
///
/// # Errors
///
/// [`DataError::Csv`] when the reader cannot produce records; rows that
/// fail normalization are skipped.
pub fn parse_spots_csv<R: Read>(reader: R, path: &str) -> Result<Vec<ParkingSpot>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|source| DataError::Csv {
            path: path.to_owned(),
            source,
        })?
        .clone();

    let mut spots = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|source| DataError::Csv {
            path: path.to_owned(),
            source,
        })?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_owned(), Value::String(v.to_owned())))
            .collect();
        if let Some(spot) = normalize_spot(&row, idx) {
            spots.push(spot);
        }
    }
    Ok(spots)
}

/// Parse a JSON spot dataset: either a GeoJSON FeatureCollection or a flat
/// list of row objects.
///
/// # Errors
///
/// [`DataError::Json`] on invalid JSON, [`DataError::UnsupportedStructure`]
/// for any other top-level shape.
pub fn parse_spots_json(text: &str, path: &str) -> Result<Vec<ParkingSpot>, DataError> {
    let value: Value = serde_json::from_str(text).map_err(|source| DataError::Json {
        path: path.to_owned(),
        source,
    })?;

    if let Some(features) = value.get("features").and_then(Value::as_array) {
        let spots = features
            .iter()
            .enumerate()
            .filter_map(|(idx, feature)| {
                let row = feature_row(feature)?;
                normalize_spot(&row, idx)
            })
            .collect();
        return Ok(spots);
    }

    if let Some(rows) = value.as_array() {
        let spots = rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| normalize_spot(row.as_object()?, idx))
            .collect();
        return Ok(spots);
    }

    Err(DataError::UnsupportedStructure {
        path: path.to_owned(),
    })
}

/// Parse the lot-area FeatureCollection into centroid-reduced lots.
///
/// # Errors
///
/// [`DataError::Json`] on invalid JSON, [`DataError::UnsupportedStructure`]
/// when the document is not a FeatureCollection.
pub fn parse_lots_geojson(text: &str, path: &str) -> Result<Vec<ParkingLot>, DataError> {
    let value: Value = serde_json::from_str(text).map_err(|source| DataError::Json {
        path: path.to_owned(),
        source,
    })?;

    let Some(features) = value.get("features").and_then(Value::as_array) else {
        return Err(DataError::UnsupportedStructure {
            path: path.to_owned(),
        });
    };

    Ok(features
        .iter()
        .enumerate()
        .filter_map(|(idx, feature)| normalize_lot(feature, idx))
        .collect())
}

/// Build an alias-table row from a GeoJSON feature: its properties, with
/// the geometry-derived lat/lon added only when the properties do not
/// already carry them.
fn feature_row(feature: &Value) -> Option<Map<String, Value>> {
    let mut row = feature
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if let Some(geometry) = feature.get("geometry") {
        if let Some((lat, lon)) = reduce_to_point(geometry) {
            row.entry("lat".to_owned()).or_insert_with(|| lat.into());
            row.entry("lon".to_owned()).or_insert_with(|| lon.into());
        }
    }
    Some(row)
}

/// Normalize one row into a [`ParkingSpot`]; rows without both coordinates
/// are dropped.
fn normalize_spot(row: &Map<String, Value>, idx: usize) -> Option<ParkingSpot> {
    let lat = field_f64(row, LAT_ALIASES)?;
    let lon = field_f64(row, LON_ALIASES)?;
    if !coordinates_valid(lat, lon) {
        return None;
    }

    let id = field_string(row, ID_ALIASES).unwrap_or_else(|| idx.to_string());

    Some(ParkingSpot {
        id,
        lat,
        lon,
        spot_type: field_string(row, TYPE_ALIASES),
        rules: field_string(row, RULES_ALIASES),
        address: field_string(row, ADDRESS_ALIASES),
        description: field_string(row, DESCRIPTION_ALIASES),
    })
}

/// Normalize one lot feature; features with no reducible geometry are
/// dropped.
fn normalize_lot(feature: &Value, idx: usize) -> Option<ParkingLot> {
    let props = feature
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let geometry = feature.get("geometry")?;
    let (lat, lon) = reduce_to_point(geometry)?;
    if !coordinates_valid(lat, lon) {
        return None;
    }

    let object_id = field_string(&props, &["OBJECTID"]);
    let lot_id = field_string(&props, &["LOT_ID"]);
    let label = field_string(&props, &["LOT_NAME"])
        .or_else(|| field_string(&props, &["MAP_LABEL"]))
        .or_else(|| object_id.clone())
        .unwrap_or_else(|| idx.to_string());
    let id = lot_id.or(object_id).unwrap_or_else(|| idx.to_string());

    Some(ParkingLot {
        id,
        label,
        lat,
        lon,
        accessible_spaces: field_i64(&props, &["HANDICAP_SPACE"]),
        capacity: field_i64(&props, &["CAPACITY"]),
    })
}

fn coordinates_valid(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}
