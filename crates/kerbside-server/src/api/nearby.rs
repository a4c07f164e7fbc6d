use axum::{extract::State, Extension, Json};
use kerbside_data::{LotHit, SpotHit};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{parse_f64_arg, parse_i64_arg, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_NEARBY_RADIUS_M: f64 = 1_500.0;
const DEFAULT_NEARBY_LIMIT: i64 = 30;
const DEFAULT_SPOT_K: i64 = 5;

/// Raw string parameters so blank or malformed numerics degrade to
/// defaults instead of a framework-level rejection. Only an unusable
/// center point is a hard 400.
#[derive(Debug, Deserialize)]
pub(super) struct NearbyLotParams {
    lat: Option<String>,
    lng: Option<String>,
    radius_m: Option<String>,
    /// Legacy alias for `radius_m`, still sent by older map clients.
    radius_meters: Option<String>,
    limit: Option<String>,
}

/// `GET /nearby`: rank parking lots by distance from a point, each with
/// an availability probability.
pub(super) async fn nearby_lots(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    axum::extract::Query(params): axum::extract::Query<NearbyLotParams>,
) -> Result<Json<ApiResponse<Vec<LotHit>>>, ApiError> {
    let (Some(lat), Some(lng)) = (
        parse_f64_arg(params.lat.as_deref()),
        parse_f64_arg(params.lng.as_deref()),
    ) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "lat/lng are required",
        ));
    };

    let radius_m = parse_f64_arg(params.radius_m.as_deref())
        .or_else(|| parse_f64_arg(params.radius_meters.as_deref()))
        .unwrap_or(DEFAULT_NEARBY_RADIUS_M);
    let limit = parse_i64_arg(params.limit.as_deref()).unwrap_or(DEFAULT_NEARBY_LIMIT);
    let limit = usize::try_from(limit.max(0)).unwrap_or(0).max(1);

    let data = state.lots.nearby_with_scores(lat, lng, radius_m, limit);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct NearbySpotParams {
    lat: Option<String>,
    lon: Option<String>,
    k: Option<String>,
    radius_m: Option<String>,
}

/// `GET /spots` returns the k nearest individual accessible spots, optionally
/// capped by a radius.
pub(super) async fn nearby_spots(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    axum::extract::Query(params): axum::extract::Query<NearbySpotParams>,
) -> Result<Json<ApiResponse<Vec<SpotHit>>>, ApiError> {
    let (Some(lat), Some(lon)) = (
        parse_f64_arg(params.lat.as_deref()),
        parse_f64_arg(params.lon.as_deref()),
    ) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "lat/lon are required",
        ));
    };

    let k = parse_i64_arg(params.k.as_deref()).unwrap_or(DEFAULT_SPOT_K);
    let k = usize::try_from(k.max(0)).unwrap_or(0);
    let radius_m = parse_f64_arg(params.radius_m.as_deref());

    let data = state.spots.nearby(lat, lon, radius_m, k);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
