//! HTTP router and listener

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::error::ServerError;
use crate::state::AppState;
use crate::{api, ws};

/// Build the application router: `/ws`, `/api/presence`, static files
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/presence", get(api::presence))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address
pub async fn bind(state: &AppState) -> Result<TcpListener, ServerError> {
    let addr = state.config.bind_addr;
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
