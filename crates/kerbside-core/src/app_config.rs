use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Lot-area GeoJSON loaded into the lot index at startup.
    pub lots_path: PathBuf,
    /// Optional spot-centric dataset (CSV / JSON / GeoJSON).
    pub spots_path: Option<PathBuf>,
    pub geocode_base_url: String,
    pub geocode_timeout_secs: u64,
    pub geocode_user_agent: String,
    pub backboard_base_url: String,
    /// When absent, intent resolution always takes the deterministic fallback.
    pub backboard_api_key: Option<String>,
    pub backboard_llm_provider: String,
    pub backboard_model_name: String,
    pub backboard_send_timeout_secs: u64,
    pub backboard_send_retries: u32,
    pub backboard_retry_backoff_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("lots_path", &self.lots_path)
            .field("spots_path", &self.spots_path)
            .field("geocode_base_url", &self.geocode_base_url)
            .field("geocode_timeout_secs", &self.geocode_timeout_secs)
            .field("geocode_user_agent", &self.geocode_user_agent)
            .field("backboard_base_url", &self.backboard_base_url)
            .field(
                "backboard_api_key",
                &self.backboard_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("backboard_llm_provider", &self.backboard_llm_provider)
            .field("backboard_model_name", &self.backboard_model_name)
            .field(
                "backboard_send_timeout_secs",
                &self.backboard_send_timeout_secs,
            )
            .field("backboard_send_retries", &self.backboard_send_retries)
            .field(
                "backboard_retry_backoff_secs",
                &self.backboard_retry_backoff_secs,
            )
            .finish()
    }
}
