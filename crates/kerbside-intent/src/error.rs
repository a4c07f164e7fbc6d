use thiserror::Error;

/// Errors returned by the Backboard API client.
///
/// These never escape [`crate::IntentResolver`]; it absorbs them into the
/// fallback intent with a shortened note.
#[derive(Debug, Error)]
pub enum IntentError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an unexpected status code.
    #[error("backboard {call} failed: {status} {body}")]
    UnexpectedStatus {
        call: &'static str,
        status: u16,
        body: String,
    },

    /// A required identifier was missing or empty in an API response.
    #[error("backboard {call} response missing {field}")]
    MissingField {
        call: &'static str,
        field: &'static str,
    },
}
