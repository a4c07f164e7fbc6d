mod api;
mod middleware;
mod search;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use kerbside_core::models::BoundingBox;
use kerbside_data::{load_lots, load_spots, LotIndex, SpotIndex};
use kerbside_geocode::GeocodeClient;
use kerbside_intent::{BackboardClient, BackboardConfig, IntentResolver};

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = kerbside_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Dataset problems degrade to empty indexes; the process still serves
    // /health and the geocoding endpoints.
    let lots = match load_lots(&config.lots_path) {
        Ok(lots) => {
            tracing::info!(count = lots.len(), path = %config.lots_path.display(), "loaded parking lots");
            LotIndex::new(lots)
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %config.lots_path.display(), "failed to load parking lots; starting with an empty index");
            LotIndex::default()
        }
    };

    let spots = match &config.spots_path {
        Some(path) => match load_spots(path) {
            Ok(spots) => {
                tracing::info!(count = spots.len(), path = %path.display(), "loaded parking spots");
                SpotIndex::new(spots)
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "failed to load parking spots; starting with an empty index");
                SpotIndex::default()
            }
        },
        None => SpotIndex::default(),
    };

    let geocode = GeocodeClient::with_base_url(
        config.geocode_timeout_secs,
        &config.geocode_user_agent,
        &config.geocode_base_url,
    )?;

    let backboard = match &config.backboard_api_key {
        Some(api_key) => Some(BackboardClient::new(&BackboardConfig {
            base_url: config.backboard_base_url.clone(),
            api_key: api_key.clone(),
            llm_provider: config.backboard_llm_provider.clone(),
            model_name: config.backboard_model_name.clone(),
            send_timeout_secs: config.backboard_send_timeout_secs,
            send_retries: config.backboard_send_retries,
            retry_backoff_secs: config.backboard_retry_backoff_secs,
        })?),
        None => {
            tracing::warn!("BACKBOARD_API_KEY not set; ai search will use the deterministic fallback intent");
            None
        }
    };

    let app = build_app(AppState {
        lots: Arc::new(lots),
        spots: Arc::new(spots),
        geocode: Arc::new(geocode),
        intent: Arc::new(IntentResolver::new(backboard)),
        bounds: BoundingBox::kingston(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
