//! Field-name aliasing for loosely-typed input datasets.
//!
//! Municipal exports spell the same logical field several ways
//! (`lat`/`latitude`/`LAT`/`Y`, ...). Each logical attribute gets an
//! ordered candidate list; the first key that is present and non-empty
//! wins. The tables live here, independent of the loader, so they stay
//! testable on their own.

use serde_json::{Map, Value};

pub const LAT_ALIASES: &[&str] = &["lat", "latitude", "LAT", "Y"];
pub const LON_ALIASES: &[&str] = &["lon", "lng", "longitude", "LON", "X"];
pub const ID_ALIASES: &[&str] = &["id", "ID", "objectid", "OBJECTID", "spot_id"];
pub const TYPE_ALIASES: &[&str] = &["type", "TYPE", "spot_type", "SpaceType", "category"];
pub const RULES_ALIASES: &[&str] = &["rules", "RULES", "regulation", "Regulations", "payment"];
pub const ADDRESS_ALIASES: &[&str] = &["address", "ADDRESS", "street", "Street", "location"];
pub const DESCRIPTION_ALIASES: &[&str] = &["description", "DESCRIPTION", "desc", "notes"];

/// First value whose key is present and non-empty, in alias order.
///
/// `null` and empty/whitespace-only strings count as absent.
#[must_use]
pub fn field_value<'a>(row: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| {
        row.get(*key).filter(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
    })
}

/// Stringified field value: strings pass through trimmed, numbers are
/// rendered, everything else is absent.
#[must_use]
pub fn field_string(row: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    match field_value(row, aliases)? {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric field value: JSON numbers directly, numeric strings parsed.
#[must_use]
pub fn field_f64(row: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    match field_value(row, aliases)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer field value; numeric strings (including `"12.0"`) truncate.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn field_i64(row: &Map<String, Value>, aliases: &[&str]) -> Option<i64> {
    match field_value(row, aliases)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    #[test]
    fn first_present_alias_wins() {
        let r = row(json!({ "latitude": 44.25, "LAT": 1.0 }));
        assert_eq!(field_f64(&r, LAT_ALIASES), Some(44.25));
    }

    #[test]
    fn earlier_alias_beats_later_even_when_both_present() {
        let r = row(json!({ "lat": 44.1, "Y": 99.0 }));
        assert_eq!(field_f64(&r, LAT_ALIASES), Some(44.1));
    }

    #[test]
    fn empty_and_null_values_are_skipped() {
        let r = row(json!({ "lat": "", "latitude": null, "LAT": "44.3" }));
        assert_eq!(field_f64(&r, LAT_ALIASES), Some(44.3));
    }

    #[test]
    fn numeric_strings_parse() {
        let r = row(json!({ "lng": "-76.51" }));
        assert_eq!(field_f64(&r, LON_ALIASES), Some(-76.51));
        let r = row(json!({ "OBJECTID": "17" }));
        assert_eq!(field_i64(&r, ID_ALIASES), Some(17));
        let r = row(json!({ "OBJECTID": "17.0" }));
        assert_eq!(field_i64(&r, ID_ALIASES), Some(17));
    }

    #[test]
    fn non_numeric_values_yield_none() {
        let r = row(json!({ "lat": "north-ish" }));
        assert_eq!(field_f64(&r, LAT_ALIASES), None);
    }

    #[test]
    fn numeric_ids_stringify() {
        let r = row(json!({ "OBJECTID": 42 }));
        assert_eq!(field_string(&r, ID_ALIASES), Some("42".to_owned()));
    }

    #[test]
    fn strings_are_trimmed() {
        let r = row(json!({ "address": "  12 Princess St  " }));
        assert_eq!(
            field_string(&r, ADDRESS_ALIASES),
            Some("12 Princess St".to_owned())
        );
    }
}
