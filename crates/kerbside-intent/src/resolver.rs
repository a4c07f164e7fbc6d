//! Turns free-form user text into a [`SearchIntent`].
//!
//! The resolver asks the Backboard assistant for a strict JSON intent and
//! falls back to a deterministic intent when the assistant is not
//! configured, unreachable, or answers with something unparseable. The
//! `notes` field carries which path produced the result.

use kerbside_core::models::{
    clamp_place_limit, clamp_radius_m, clamp_spot_limit, BoundingBox, SearchIntent,
};
use serde_json::{Map, Value};

use crate::client::BackboardClient;
use crate::extract::{extract_first_json_object, shorten_error_text};

/// Resolves user text into a structured search intent.
///
/// Built with `None` when no Backboard API key is configured; every call
/// then takes the deterministic fallback path.
pub struct IntentResolver {
    client: Option<BackboardClient>,
}

impl IntentResolver {
    #[must_use]
    pub fn new(client: Option<BackboardClient>) -> Self {
        Self { client }
    }

    /// Resolve `text` to an intent. This never fails: any assistant
    /// problem degrades to the deterministic fallback with an explanatory
    /// note.
    pub async fn resolve(&self, text: &str, bounds: &BoundingBox) -> SearchIntent {
        let Some(client) = &self.client else {
            return SearchIntent::fallback(text, "fallback: backboard api key not configured");
        };

        match self.resolve_via_backboard(client, text, bounds).await {
            Ok(intent) => intent,
            Err(err) => {
                tracing::warn!(error = %err, "intent resolution via backboard failed");
                SearchIntent::fallback(
                    text,
                    format!(
                        "fallback: backboard unavailable ({})",
                        shorten_error_text(&err.to_string())
                    ),
                )
            }
        }
    }

    async fn resolve_via_backboard(
        &self,
        client: &BackboardClient,
        text: &str,
        bounds: &BoundingBox,
    ) -> Result<SearchIntent, crate::error::IntentError> {
        let assistant_id = client.ensure_assistant().await?;
        let thread_id = client.create_thread(assistant_id).await?;
        let prompt = build_prompt(text, bounds);
        let reply = client.send_message(&thread_id, &prompt).await?;
        Ok(intent_from_model_text(text, &reply))
    }
}

/// Builds the instruction payload sent to the assistant. The whole thing
/// is serialized JSON so the rules and the expected output schema survive
/// any prompt templating on the provider side.
fn build_prompt(text: &str, bounds: &BoundingBox) -> String {
    let payload = serde_json::json!({
        "task": "Parse the user's parking request into a JSON search intent.",
        "rules": [
            "Answer with a single JSON object and nothing else.",
            "query: the place or kind of place the user wants to park near, as free text.",
            "radius_m: search radius in metres, integer, between 50 and 20000.",
            "limit: maximum number of parking results, integer, between 1 and 100.",
            "place_limit: maximum number of place candidates, integer, between 1 and 20.",
            "notes: one short sentence on how you interpreted the request.",
            "When the user names no place, use their text as the query unchanged.",
        ],
        "kingston_bounds": {
            "min_lat": bounds.min_lat,
            "min_lng": bounds.min_lng,
            "max_lat": bounds.max_lat,
            "max_lng": bounds.max_lng,
        },
        "user_text": text,
        "output_schema": {
            "query": "string",
            "radius_m": "integer",
            "limit": "integer",
            "place_limit": "integer",
            "notes": "string",
        },
    });
    payload.to_string()
}

/// Converts a model reply into an intent, field by field.
///
/// Every field falls back independently: a reply that only supplies
/// `radius_m` still gets the user's text as the query and default limits.
/// Out-of-range numbers are clamped rather than rejected.
#[must_use]
pub fn intent_from_model_text(user_text: &str, reply: &str) -> SearchIntent {
    let Some(map) = extract_first_json_object(reply) else {
        return SearchIntent::fallback(user_text, "fallback: model reply had no json object");
    };

    let query = map
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| user_text.trim())
        .to_owned();

    let radius_m = value_as_i64(map.get("radius_m"))
        .map_or(SearchIntent::DEFAULT_RADIUS_M, clamp_radius_m);
    let limit =
        value_as_i64(map.get("limit")).map_or(SearchIntent::DEFAULT_LIMIT, clamp_spot_limit);
    let place_limit = value_as_i64(map.get("place_limit"))
        .map_or(SearchIntent::DEFAULT_PLACE_LIMIT, clamp_place_limit);

    let notes = notes_field(&map);

    SearchIntent {
        query,
        radius_m,
        limit,
        place_limit,
        notes,
    }
}

fn notes_field(map: &Map<String, Value>) -> String {
    map.get("notes")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_owned()
}

/// Accepts JSON numbers and numeric strings ("2000", "2000.0"); models
/// quote integers often enough that rejecting strings loses real data.
fn value_as_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}
