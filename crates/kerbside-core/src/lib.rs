pub mod app_config;
pub mod config;
pub mod models;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use models::{
    clamp_autocomplete_limit, clamp_place_limit, clamp_radius_m, clamp_spot_limit, BoundingBox,
    ParkingLot, ParkingSpot, PlaceCandidate, SearchIntent,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
