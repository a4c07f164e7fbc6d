//! Shared domain types and the server-side clamp bounds.
//!
//! Every radius/limit that reaches the index or an outbound call is first
//! pushed through one of the `clamp_*` helpers so callers can never force
//! unbounded scans or unbounded result payloads.

use serde::{Deserialize, Serialize};

/// Radius bounds for nearby searches, in meters.
pub const RADIUS_M_MIN: u32 = 50;
pub const RADIUS_M_MAX: u32 = 20_000;

/// Result-count bounds for ranked spot lists.
pub const SPOT_LIMIT_MIN: usize = 1;
pub const SPOT_LIMIT_MAX: usize = 100;

/// Result-count bounds for raw autocomplete calls.
pub const AUTOCOMPLETE_LIMIT_MIN: usize = 1;
pub const AUTOCOMPLETE_LIMIT_MAX: usize = 50;

/// Result-count bounds for merged place-candidate lists.
pub const PLACE_LIMIT_MIN: usize = 1;
pub const PLACE_LIMIT_MAX: usize = 20;

#[must_use]
pub fn clamp_radius_m(v: i64) -> u32 {
    u32::try_from(v.clamp(i64::from(RADIUS_M_MIN), i64::from(RADIUS_M_MAX))).unwrap_or(RADIUS_M_MIN)
}

#[must_use]
pub fn clamp_spot_limit(v: i64) -> usize {
    clamp_to_usize(v, SPOT_LIMIT_MIN, SPOT_LIMIT_MAX)
}

#[must_use]
pub fn clamp_autocomplete_limit(v: i64) -> usize {
    clamp_to_usize(v, AUTOCOMPLETE_LIMIT_MIN, AUTOCOMPLETE_LIMIT_MAX)
}

#[must_use]
pub fn clamp_place_limit(v: i64) -> usize {
    clamp_to_usize(v, PLACE_LIMIT_MIN, PLACE_LIMIT_MAX)
}

fn clamp_to_usize(v: i64, min: usize, max: usize) -> usize {
    usize::try_from(v.max(0)).map_or(min, |n| n.clamp(min, max))
}

/// A single accessible parking space from the spot-centric dataset.
///
/// Immutable after load; a reload builds a whole new set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub spot_type: Option<String>,
    pub rules: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

/// A parking lot reduced to its centroid, from the lot-area GeoJSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingLot {
    pub id: String,
    pub label: String,
    pub lat: f64,
    pub lon: f64,
    /// Count of accessible spaces, when the dataset provides it.
    pub accessible_spaces: Option<i64>,
    /// Total capacity of the lot, when the dataset provides it.
    pub capacity: Option<i64>,
}

/// One geocoded place returned by the place resolver. Transient, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub id: String,
    pub label: String,
    pub subtitle: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// A normalized, fully clamped search request derived from free text.
///
/// `notes` records how the intent was produced, including fallback reasons,
/// so responses stay explainable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIntent {
    pub query: String,
    pub radius_m: u32,
    pub limit: usize,
    pub place_limit: usize,
    pub notes: String,
}

impl SearchIntent {
    pub const DEFAULT_RADIUS_M: u32 = 1_500;
    pub const DEFAULT_LIMIT: usize = 30;
    pub const DEFAULT_PLACE_LIMIT: usize = 10;

    /// The deterministic default intent used whenever the language-model
    /// path is unavailable or fails.
    #[must_use]
    pub fn fallback(text: &str, notes: impl Into<String>) -> Self {
        Self {
            query: text.trim().to_owned(),
            radius_m: Self::DEFAULT_RADIUS_M,
            limit: Self::DEFAULT_LIMIT,
            place_limit: Self::DEFAULT_PLACE_LIMIT,
            notes: notes.into(),
        }
    }
}

/// Geographic viewport, degrees WGS84.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Default service region: Kingston, Ontario and surroundings.
    #[must_use]
    pub fn kingston() -> Self {
        Self {
            min_lat: 44.10,
            min_lng: -76.70,
            max_lat: 44.40,
            max_lng: -76.20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_clamped_into_bounds() {
        assert_eq!(clamp_radius_m(-5), 50);
        assert_eq!(clamp_radius_m(0), 50);
        assert_eq!(clamp_radius_m(1_500), 1_500);
        assert_eq!(clamp_radius_m(9_999_999), 20_000);
    }

    #[test]
    fn spot_limit_is_clamped_into_bounds() {
        assert_eq!(clamp_spot_limit(-1), 1);
        assert_eq!(clamp_spot_limit(0), 1);
        assert_eq!(clamp_spot_limit(30), 30);
        assert_eq!(clamp_spot_limit(500), 100);
    }

    #[test]
    fn autocomplete_and_place_limits_have_their_own_bounds() {
        assert_eq!(clamp_autocomplete_limit(200), 50);
        assert_eq!(clamp_place_limit(200), 20);
        assert_eq!(clamp_place_limit(0), 1);
    }

    #[test]
    fn fallback_intent_uses_documented_defaults() {
        let intent = SearchIntent::fallback("  find parking near the market ", "fallback: test");
        assert_eq!(intent.query, "find parking near the market");
        assert_eq!(intent.radius_m, 1_500);
        assert_eq!(intent.limit, 30);
        assert_eq!(intent.place_limit, 10);
        assert_eq!(intent.notes, "fallback: test");
    }

    #[test]
    fn search_intent_serializes_with_expected_keys() {
        let intent = SearchIntent::fallback("queens university", "");
        let json = serde_json::to_value(&intent).expect("serialize");
        assert_eq!(json["query"], "queens university");
        assert_eq!(json["radius_m"], 1_500);
        assert_eq!(json["place_limit"], 10);
    }

    #[test]
    fn kingston_bounds_cover_downtown() {
        let b = BoundingBox::kingston();
        assert!(b.min_lat < 44.2312 && 44.2312 < b.max_lat);
        assert!(b.min_lng < -76.4860 && -76.4860 < b.max_lng);
    }
}
