use axum::{extract::State, Extension, Json};
use kerbside_core::models::{clamp_autocomplete_limit, BoundingBox, PlaceCandidate};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{parse_f64_arg, parse_i64_arg, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_AUTOCOMPLETE_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteParams {
    q: Option<String>,
    /// Alias for `q`.
    query: Option<String>,
    limit: Option<String>,
    min_lat: Option<String>,
    min_lng: Option<String>,
    max_lat: Option<String>,
    max_lng: Option<String>,
}

impl AutocompleteParams {
    fn text(&self) -> &str {
        self.q
            .as_deref()
            .or(self.query.as_deref())
            .unwrap_or_default()
            .trim()
    }

    /// A viewport applies only when all four corners are present.
    fn viewport(&self) -> Option<BoundingBox> {
        Some(BoundingBox {
            min_lat: parse_f64_arg(self.min_lat.as_deref())?,
            min_lng: parse_f64_arg(self.min_lng.as_deref())?,
            max_lat: parse_f64_arg(self.max_lat.as_deref())?,
            max_lng: parse_f64_arg(self.max_lng.as_deref())?,
        })
    }
}

/// `GET /autocomplete`: forward-geocode a partial query into place
/// candidates, optionally bounded to a map viewport.
pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    axum::extract::Query(params): axum::extract::Query<AutocompleteParams>,
) -> Result<Json<ApiResponse<Vec<PlaceCandidate>>>, ApiError> {
    let text = params.text();
    if text.is_empty() {
        return Ok(Json(ApiResponse {
            data: Vec::new(),
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let limit = clamp_autocomplete_limit(
        parse_i64_arg(params.limit.as_deref()).unwrap_or(DEFAULT_AUTOCOMPLETE_LIMIT),
    );
    let viewport = params.viewport();

    let data = state
        .geocode
        .search(text, limit, viewport.as_ref())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, query = %text, "autocomplete geocoding failed");
            ApiError::new(
                req_id.0.clone(),
                "bad_gateway",
                format!("geocoding request failed: {e}"),
            )
        })?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
