//! HTTP client for a Nominatim-compatible geocoding API.
//!
//! Wraps `reqwest` with timeouts, a descriptive user agent, and typed
//! response rows. The service is best-effort and externally rate limited;
//! items that fail to yield numeric coordinates are skipped rather than
//! failing the whole call.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use kerbside_core::models::{clamp_autocomplete_limit, BoundingBox, PlaceCandidate};

use crate::error::GeocodeError;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Client for the geocoding `/search` endpoint.
///
/// Use [`GeocodeClient::new`] for production or
/// [`GeocodeClient::with_base_url`] to point at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|_| GeocodeError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self { client, base_url })
    }

    /// Runs one forward-geocoding search.
    ///
    /// The limit is clamped to the autocomplete bounds. When a viewport is
    /// given, results are bounded to it. Blank queries return an empty list
    /// without a network call.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not a JSON list.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        viewport: Option<&BoundingBox>,
    ) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = clamp_autocomplete_limit(i64::try_from(limit).unwrap_or(i64::MAX));

        let url = self.build_search_url(query, limit, viewport);
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let items: Vec<NominatimItem> =
            serde_json::from_str(&body).map_err(|source| GeocodeError::Deserialize {
                context: url.to_string(),
                source,
            })?;

        Ok(items
            .into_iter()
            .filter_map(|item| candidate_from_item(item, query))
            .collect())
    }

    fn build_search_url(
        &self,
        query: &str,
        limit: usize,
        viewport: Option<&BoundingBox>,
    ) -> Url {
        // The stored base always ends in "/", so join appends the segment.
        let mut url = self
            .base_url
            .join("search")
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "jsonv2");
            pairs.append_pair("q", query);
            pairs.append_pair("limit", &limit.to_string());
            pairs.append_pair("addressdetails", "1");
            if let Some(b) = viewport {
                // Nominatim viewbox order: left, top, right, bottom.
                pairs.append_pair(
                    "viewbox",
                    &format!("{},{},{},{}", b.min_lng, b.max_lat, b.max_lng, b.min_lat),
                );
                pairs.append_pair("bounded", "1");
            }
        }
        url
    }
}

/// One raw Nominatim search result. Coordinates arrive as strings in
/// `jsonv2`; numbers are tolerated too.
#[derive(Debug, Deserialize)]
struct NominatimItem {
    place_id: Option<serde_json::Value>,
    osm_id: Option<serde_json::Value>,
    lat: Option<serde_json::Value>,
    lon: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    pedestrian: Option<String>,
    footway: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    postcode: Option<String>,
}

fn candidate_from_item(item: NominatimItem, query: &str) -> Option<PlaceCandidate> {
    let lat = coerce_f64(item.lat.as_ref())?;
    let lon = coerce_f64(item.lon.as_ref())?;

    let name = item.name.as_deref().unwrap_or("").trim();
    let display = item.display_name.as_deref().unwrap_or("").trim();
    let label = if name.is_empty() {
        display
            .split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(query)
            .to_owned()
    } else {
        name.to_owned()
    };

    let id = stringify_id(item.place_id.as_ref())
        .or_else(|| stringify_id(item.osm_id.as_ref()))
        .unwrap_or_else(|| label.clone());

    let subtitle = format_subtitle(&item.address, display);

    Some(PlaceCandidate {
        id,
        label,
        subtitle,
        lat,
        lon,
    })
}

fn coerce_f64(value: Option<&serde_json::Value>) -> Option<f64> {
    match value? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn stringify_id(value: Option<&serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

/// Short address fragment for UI display: street + postcode when the
/// address components carry them, else the first two display-name
/// segments, else the city (defaulting to Kingston).
fn format_subtitle(address: &NominatimAddress, display_name: &str) -> Option<String> {
    let clean = |v: &Option<String>| -> Option<String> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
    };

    let house = clean(&address.house_number);
    let road = clean(&address.road)
        .or_else(|| clean(&address.pedestrian))
        .or_else(|| clean(&address.footway));
    let street = match (house, road) {
        (Some(h), Some(r)) => Some(format!("{h} {r}")),
        (None, Some(r)) => Some(r),
        (Some(h), None) => Some(h),
        (None, None) => None,
    };

    let parts: Vec<String> = [street, clean(&address.postcode)]
        .into_iter()
        .flatten()
        .collect();
    if !parts.is_empty() {
        return Some(parts.join(", "));
    }

    if !display_name.is_empty() {
        let segments: Vec<&str> = display_name
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(2)
            .collect();
        if !segments.is_empty() {
            return Some(segments.join(", "));
        }
    }

    Some(
        clean(&address.city)
            .or_else(|| clean(&address.town))
            .or_else(|| clean(&address.village))
            .unwrap_or_else(|| "Kingston".to_owned()),
    )
}
