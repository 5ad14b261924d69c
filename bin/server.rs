// Health Screening - Prediction Server
// Serves POST /predict/{form} with the rule-based scores

use anyhow::{Context, Result};
use health_screening::server::{build_router, AppState};
use health_screening::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    let app = build_router(AppState::new());

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.addr))?;

    info!(
        addr = %config.server.addr,
        version = health_screening::VERSION,
        "prediction server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
