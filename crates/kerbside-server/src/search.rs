//! Orchestration for natural-language parking search.
//!
//! Pipeline: resolve the user's text to a clamped intent, resolve the
//! intent's query to place candidates, then rank lots around the first
//! candidate. Intent resolution never fails; geocoding failures bubble up
//! so the HTTP layer can answer 502.

use kerbside_core::models::{BoundingBox, PlaceCandidate, SearchIntent};
use kerbside_data::LotHit;
use kerbside_geocode::{resolve_places, GeocodeError};
use serde::Serialize;

use crate::api::AppState;

/// Full result of one orchestrated search.
///
/// `selected_place` is the anchor the spot ranking used; when no place
/// resolved, it is `None` and both lists are empty except `places`.
#[derive(Debug, Serialize)]
pub struct AiSearchData {
    pub intent: SearchIntent,
    pub selected_place: Option<PlaceCandidate>,
    pub places: Vec<PlaceCandidate>,
    pub spots: Vec<LotHit>,
}

/// Run the intent → places → lots pipeline.
///
/// # Errors
///
/// Returns [`GeocodeError`] when place resolution fails; the caller maps
/// that to a 502.
pub async fn run_ai_search(
    state: &AppState,
    text: &str,
    bounds: &BoundingBox,
) -> Result<AiSearchData, GeocodeError> {
    let intent = state.intent.resolve(text, bounds).await;
    tracing::debug!(
        query = %intent.query,
        radius_m = intent.radius_m,
        notes = %intent.notes,
        "resolved search intent"
    );

    let places = resolve_places(&state.geocode, &intent.query, intent.place_limit, bounds).await?;

    let selected_place = places.first().cloned();
    let spots = match &selected_place {
        Some(place) => state.lots.nearby_with_scores(
            place.lat,
            place.lon,
            f64::from(intent.radius_m),
            intent.limit,
        ),
        None => Vec::new(),
    };

    Ok(AiSearchData {
        intent,
        selected_place,
        places,
        spots,
    })
}
