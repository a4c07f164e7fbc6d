//! Place resolution against a Nominatim-style geocoding service.
//!
//! Wraps one external `/search` call with query expansion for generic
//! grocery terms and order-preserving deduplication of the merged
//! candidates.

pub mod client;
pub mod error;
pub mod expand;
pub mod resolve;

pub use client::GeocodeClient;
pub use error::GeocodeError;
pub use expand::expanded_place_queries;
pub use resolve::resolve_places;
