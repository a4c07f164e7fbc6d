pub mod aliases;
pub mod availability;
pub mod geo;
pub mod geometry;
pub mod index;
pub mod loader;

use thiserror::Error;

pub use availability::{lot_probability, predict_availability, Prediction};
pub use geo::haversine_m;
pub use geometry::reduce_to_point;
pub use index::{LotHit, LotIndex, SpotHit, SpotIndex};
pub use loader::{load_lots, load_spots};

/// Errors raised while loading a parking dataset.
///
/// These are startup-time conditions: the server logs them and continues
/// with an empty index. Individual malformed records never produce an error;
/// they are skipped during normalization.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in dataset {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in dataset {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported dataset extension for {path} (expected .csv/.json/.geojson)")]
    UnsupportedExtension { path: String },

    #[error("unsupported JSON structure in {path} (expected FeatureCollection or list)")]
    UnsupportedStructure { path: String },
}
