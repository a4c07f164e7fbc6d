use axum::{extract::State, Extension, Json};
use kerbside_core::models::BoundingBox;
use serde::Deserialize;

use crate::middleware::RequestId;
use crate::search::{run_ai_search, AiSearchData};

use super::{parse_f64_arg, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AiSearchParams {
    q: Option<String>,
    /// Alias for `q`.
    text: Option<String>,
    min_lat: Option<String>,
    min_lng: Option<String>,
    max_lat: Option<String>,
    max_lng: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AiSearchBody {
    q: Option<String>,
    text: Option<String>,
}

impl AiSearchParams {
    fn text(&self) -> &str {
        self.q
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or_default()
            .trim()
    }

    /// Configured region defaults, overridden per field by any corner the
    /// caller supplies.
    fn bounds(&self, default: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_lat: parse_f64_arg(self.min_lat.as_deref()).unwrap_or(default.min_lat),
            min_lng: parse_f64_arg(self.min_lng.as_deref()).unwrap_or(default.min_lng),
            max_lat: parse_f64_arg(self.max_lat.as_deref()).unwrap_or(default.max_lat),
            max_lng: parse_f64_arg(self.max_lng.as_deref()).unwrap_or(default.max_lng),
        }
    }
}

/// `GET /ai/search` takes the query text in the `q` (or `text`) parameter.
pub(super) async fn ai_search_get(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    axum::extract::Query(params): axum::extract::Query<AiSearchParams>,
) -> Result<Json<ApiResponse<AiSearchData>>, ApiError> {
    let text = params.text().to_owned();
    let bounds = params.bounds(&state.bounds);
    run(state, req_id, &text, bounds).await
}

/// `POST /ai/search` takes the query text in a JSON body; bbox overrides stay in
/// the query string.
pub(super) async fn ai_search_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    axum::extract::Query(params): axum::extract::Query<AiSearchParams>,
    body: Option<Json<AiSearchBody>>,
) -> Result<Json<ApiResponse<AiSearchData>>, ApiError> {
    let text = body
        .as_ref()
        .and_then(|b| b.0.q.as_deref().or(b.0.text.as_deref()))
        .unwrap_or_default()
        .trim()
        .to_owned();
    let bounds = params.bounds(&state.bounds);
    run(state, req_id, &text, bounds).await
}

async fn run(
    state: AppState,
    req_id: RequestId,
    text: &str,
    bounds: BoundingBox,
) -> Result<Json<ApiResponse<AiSearchData>>, ApiError> {
    if text.is_empty() {
        return Err(ApiError::new(req_id.0, "bad_request", "text is required"));
    }

    let data = run_ai_search(&state, text, &bounds).await.map_err(|e| {
        tracing::warn!(error = %e, "place resolution failed during ai search");
        ApiError::new(
            req_id.0.clone(),
            "bad_gateway",
            format!("place resolution failed: {e}"),
        )
    })?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
