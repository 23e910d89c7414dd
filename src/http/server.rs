//! Axum-based API server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::lifecycle::LifecycleController;

use super::handlers::{self, AppState};

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bind error: {0}")]
    Bind(std::io::Error),

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/verifications", post(handlers::create_verification))
        .route(
            "/api/verifications/open",
            get(handlers::open_verification),
        )
        .route(
            "/api/verifications/status",
            get(handlers::verification_status),
        )
        .route("/api/prover/callback", post(handlers::prover_callback))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn serve(addr: SocketAddr, controller: Arc<LifecycleController>) -> Result<(), ServerError> {
    let app = router(AppState { controller });
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(ServerError::Bind)?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await.map_err(ServerError::Serve)
}
