use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{chat_handler, clear_handler, start_chat_handler};
use crate::relay::{keepalive_handler, relay_chat_handler};
use crate::state::{AppState, RelayState};

/// Routes of the chat front-end
pub fn chat_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/clear", post(clear_handler))
        .route("/start_chat", post(start_chat_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes of the completion relay
pub fn relay_router(state: RelayState) -> Router {
    Router::new()
        .route("/keepalive", get(keepalive_handler))
        .route("/chat", post(relay_chat_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` until a shutdown signal arrives, letting in-flight requests finish.
pub async fn run_server(
    app: Router,
    host: &str,
    port: u16,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            tracing::info!("Server shutting down signal received");
        })
        .await?;

    Ok(())
}
