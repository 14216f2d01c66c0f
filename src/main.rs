use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use recipe_rank::{
    config::Config,
    db::create_store,
    routes::{create_router, AppState},
    services::{HttpRecognitionProvider, PreferenceStore, RecommendationService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recipe_rank=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let storage = create_store(&config)?;
    let preferences = Arc::new(PreferenceStore::with_key(storage, config.preferences_key.clone()));

    let provider = Arc::new(HttpRecognitionProvider::new(
        config.recognition_api_url.clone(),
        Duration::from_secs(config.recognition_timeout_secs),
    )?);

    let recommendations =
        RecommendationService::new(provider, preferences.clone(), config.record_on_recognition);

    let app = create_router(Arc::new(AppState::new(recommendations, preferences)));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        recognition_api = %config.recognition_api_url,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
