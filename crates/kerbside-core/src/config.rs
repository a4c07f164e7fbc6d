use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
///
/// Every variable has a working default; the only secret, the Backboard API
/// key, is optional and its absence simply pins intent resolution to the
/// deterministic fallback.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let bind_addr = parse_addr("KERBSIDE_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("KERBSIDE_LOG_LEVEL", "info");
    let lots_path = PathBuf::from(or_default(
        "KERBSIDE_LOTS_PATH",
        "./data/Parking_Lot_Areas.geojson",
    ));
    let spots_path = optional("KERBSIDE_SPOTS_PATH").map(PathBuf::from);

    let geocode_base_url = or_default(
        "KERBSIDE_GEOCODE_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocode_timeout_secs = parse_u64("KERBSIDE_GEOCODE_TIMEOUT_SECS", "10")?;
    let geocode_user_agent = or_default(
        "KERBSIDE_GEOCODE_USER_AGENT",
        "kerbside/0.1 (accessible parking locator)",
    );

    let backboard_base_url = or_default("BACKBOARD_API_BASE_URL", "https://app.backboard.io/api");
    let backboard_api_key = optional("BACKBOARD_API_KEY");
    let backboard_llm_provider = or_default("BACKBOARD_LLM_PROVIDER", "openrouter");
    let backboard_model_name =
        or_default("BACKBOARD_MODEL_NAME", "google/gemini-3-flash-preview");
    let backboard_send_timeout_secs = parse_u64("BACKBOARD_SEND_TIMEOUT_SECS", "60")?;
    let backboard_send_retries = parse_u32("BACKBOARD_SEND_RETRIES", "1")?;
    let backboard_retry_backoff_secs = parse_u64("BACKBOARD_RETRY_BACKOFF_SECS", "1")?;

    Ok(AppConfig {
        bind_addr,
        log_level,
        lots_path,
        spots_path,
        geocode_base_url,
        geocode_timeout_secs,
        geocode_user_agent,
        backboard_base_url,
        backboard_api_key,
        backboard_llm_provider,
        backboard_model_name,
        backboard_send_timeout_secs,
        backboard_send_retries,
        backboard_retry_backoff_secs,
    })
}
