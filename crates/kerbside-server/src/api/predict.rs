use axum::{extract::State, Extension, Json};
use chrono::{Local, NaiveDateTime};
use kerbside_data::{predict_availability, Prediction};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{parse_f64_arg, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PredictParams {
    lat: Option<String>,
    lon: Option<String>,
    /// Local timestamp, e.g. `2026-08-25T08:00:00`. Absent means now.
    when: Option<String>,
}

/// `GET /predict`: time-of-day and location heuristic for how likely an
/// accessible spot is to be free near a point.
pub(super) async fn predict(
    State(_state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    axum::extract::Query(params): axum::extract::Query<PredictParams>,
) -> Result<Json<ApiResponse<Prediction>>, ApiError> {
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

    let when = match params.when.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_when(raw).ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "bad_request",
                format!("could not parse 'when' timestamp: {raw}"),
            )
        })?,
        None => Local::now().naive_local(),
    };

    Ok(Json(ApiResponse {
        data: predict_availability(lat, lon, when),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `when` values arrive as naive local timestamps; a trailing UTC offset
/// or `Z` from stricter clients is accepted and stripped.
fn parse_when(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn naive_timestamps_parse_directly() {
        let when = parse_when("2026-08-25T08:00:00").expect("parse");
        assert_eq!(when.hour(), 8);
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let when = parse_when("2026-08-25T08:00:00-04:00").expect("parse");
        assert_eq!(when.hour(), 8);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_when("next tuesday").is_none());
    }
}
