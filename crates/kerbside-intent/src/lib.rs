//! Natural-language intent resolution via the Backboard assistant API.
//!
//! The resolver turns free text into a clamped [`SearchIntent`]. When no
//! API key is configured, or anything in the remote path fails, it degrades
//! to a deterministic fallback intent — callers never see an error from
//! this crate's resolver.
//!
//! [`SearchIntent`]: kerbside_core::models::SearchIntent

pub mod client;
pub mod error;
pub mod extract;
pub mod resolver;

pub use client::{BackboardClient, BackboardConfig};
pub use error::IntentError;
pub use extract::{extract_first_json_object, shorten_error_text};
pub use resolver::IntentResolver;
