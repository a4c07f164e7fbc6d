mod ai_search;
mod nearby;
mod places;
mod predict;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use kerbside_core::models::BoundingBox;
use kerbside_data::{LotIndex, SpotIndex};
use kerbside_geocode::GeocodeClient;
use kerbside_intent::IntentResolver;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

/// Shared read-only state handed to every handler. The indexes are
/// immutable snapshots; replacing the dataset means building a new state,
/// never mutating this one.
#[derive(Clone)]
pub struct AppState {
    pub lots: Arc<LotIndex>,
    pub spots: Arc<SpotIndex>,
    pub geocode: Arc<GeocodeClient>,
    pub intent: Arc<IntentResolver>,
    pub bounds: BoundingBox,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    lots_loaded: usize,
    spots_loaded: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Lenient float parse for query arguments. Blank and unparseable values
/// read as absent, matching the tolerant inputs the map frontend sends.
pub(super) fn parse_f64_arg(value: Option<&str>) -> Option<f64> {
    let s = value?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient integer parse. Accepts "30" and "30.0" alike; anything else
/// reads as absent so callers fall back to their default.
pub(super) fn parse_i64_arg(value: Option<&str>) -> Option<i64> {
    let s = value?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/nearby", get(nearby::nearby_lots))
        .route("/spots", get(nearby::nearby_spots))
        .route("/predict", get(predict::predict))
        .route("/autocomplete", get(places::autocomplete))
        .route(
            "/ai/search",
            get(ai_search::ai_search_get).post(ai_search::ai_search_post),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Liveness endpoint. Zero loaded records is a degraded-but-running
/// condition, not a failure, so the status stays "ok" either way and the
/// counts tell the operator what actually loaded.
async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            lots_loaded: state.lots.len(),
            spots_loaded: state.spots.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_arg_handles_blank_and_garbage() {
        assert_eq!(parse_f64_arg(Some("44.23")), Some(44.23));
        assert_eq!(parse_f64_arg(Some("  -76.48 ")), Some(-76.48));
        assert_eq!(parse_f64_arg(Some("")), None);
        assert_eq!(parse_f64_arg(Some("abc")), None);
        assert_eq!(parse_f64_arg(Some("NaN")), None);
        assert_eq!(parse_f64_arg(None), None);
    }

    #[test]
    fn parse_i64_arg_truncates_float_strings() {
        assert_eq!(parse_i64_arg(Some("30")), Some(30));
        assert_eq!(parse_i64_arg(Some("30.9")), Some(30));
        assert_eq!(parse_i64_arg(Some("x")), None);
        assert_eq!(parse_i64_arg(None), None);
    }

    #[test]
    fn api_error_codes_map_to_statuses() {
        let bad = ApiError::new("req-1", "bad_request", "lat/lng are required").into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let upstream = ApiError::new("req-2", "bad_gateway", "geocoding failed").into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let other = ApiError::new("req-3", "mystery", "boom").into_response();
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
