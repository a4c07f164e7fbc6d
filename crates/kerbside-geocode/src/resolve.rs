//! Candidate merging across expansion queries.
//!
//! Queries run sequentially; candidates merge in first-seen order,
//! deduplicated by provider id when present, else by a composite
//! (lat, lon, lowercased label) key. Once the place limit is reached the
//! remaining expansion queries are skipped entirely.

use std::collections::HashSet;

use kerbside_core::models::{clamp_place_limit, BoundingBox, PlaceCandidate};

use crate::client::GeocodeClient;
use crate::error::GeocodeError;
use crate::expand::expanded_place_queries;

/// Resolve a place query into a deduplicated candidate list.
///
/// # Errors
///
/// Propagates the first [`GeocodeError`] from the underlying search calls.
pub async fn resolve_places(
    client: &GeocodeClient,
    query: &str,
    place_limit: usize,
    bounds: &BoundingBox,
) -> Result<Vec<PlaceCandidate>, GeocodeError> {
    let place_limit = clamp_place_limit(i64::try_from(place_limit).unwrap_or(i64::MAX));
    let queries = expanded_place_queries(query);

    let mut merged: Vec<PlaceCandidate> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for q in &queries {
        if merged.len() >= place_limit {
            break;
        }
        let batch = client.search(q, place_limit, Some(bounds)).await?;
        tracing::debug!(query = %q, hits = batch.len(), "geocode expansion query");
        merge_into(&mut merged, &mut seen, batch, place_limit);
    }

    Ok(merged)
}

/// Merge one batch into the accumulated list, keeping first-seen order and
/// stopping at the limit.
fn merge_into(
    merged: &mut Vec<PlaceCandidate>,
    seen: &mut HashSet<String>,
    batch: Vec<PlaceCandidate>,
    place_limit: usize,
) {
    for candidate in batch {
        if merged.len() >= place_limit {
            break;
        }
        if seen.insert(dedup_key(&candidate)) {
            merged.push(candidate);
        }
    }
}

/// Stable dedup key: provider id when present, else the coordinates plus
/// the case-folded label.
fn dedup_key(candidate: &PlaceCandidate) -> String {
    let id = candidate.id.trim();
    if id.is_empty() {
        format!(
            "{}:{}:{}",
            candidate.lat,
            candidate.lon,
            candidate.label.trim().to_lowercase()
        )
    } else {
        id.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, label: &str, lat: f64, lon: f64) -> PlaceCandidate {
        PlaceCandidate {
            id: id.to_owned(),
            label: label.to_owned(),
            subtitle: None,
            lat,
            lon,
        }
    }

    #[test]
    fn identical_ids_collapse_keeping_first_seen() {
        let mut merged = Vec::new();
        let mut seen = HashSet::new();
        merge_into(
            &mut merged,
            &mut seen,
            vec![candidate("42", "Metro", 44.23, -76.48)],
            10,
        );
        merge_into(
            &mut merged,
            &mut seen,
            vec![candidate("42", "Metro Kingston Centre", 44.23, -76.48)],
            10,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label, "Metro");
    }

    #[test]
    fn same_coordinates_and_case_different_labels_collapse() {
        let mut merged = Vec::new();
        let mut seen = HashSet::new();
        merge_into(
            &mut merged,
            &mut seen,
            vec![
                candidate("", "Food Basics", 44.2500, -76.5000),
                candidate("", "FOOD BASICS", 44.2500, -76.5000),
            ],
            10,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label, "Food Basics", "first-seen label wins");
    }

    #[test]
    fn different_coordinates_do_not_collapse() {
        let mut merged = Vec::new();
        let mut seen = HashSet::new();
        merge_into(
            &mut merged,
            &mut seen,
            vec![
                candidate("", "No Frills", 44.25, -76.50),
                candidate("", "No Frills", 44.26, -76.51),
            ],
            10,
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_stops_at_the_limit() {
        let mut merged = Vec::new();
        let mut seen = HashSet::new();
        let batch = (0..10)
            .map(|i| candidate(&i.to_string(), "store", 44.0 + f64::from(i), -76.0))
            .collect();
        merge_into(&mut merged, &mut seen, batch, 3);
        assert_eq!(merged.len(), 3);
        let ids: Vec<&str> = merged.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2"]);
    }
}
