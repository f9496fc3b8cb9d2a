use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_relay::{config::RelayConfig, error::ServerError, server, state::AppState};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting chat relay...");

    let state = Arc::new(AppState::new(RelayConfig::from_env()));
    let listener = server::bind(&state).await?;

    if let Err(e) = server::serve(listener, state).await {
        tracing::error!("{}", e);
        return Err(e);
    }
    Ok(())
}
