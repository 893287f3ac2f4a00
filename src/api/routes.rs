//! HTTP router and server bootstrap.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::store::TaskStore;

use super::tasks;

/// Shared application state.
///
/// Constructed once in [`serve`] and injected into every handler; there is
/// no module-level client.
pub struct AppState {
    pub config: Config,
    /// Gateway to the external store.
    pub store: Arc<dyn TaskStore>,
}

/// Start the HTTP server.
pub async fn serve(config: Config, store: Arc<dyn TaskStore>) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState { config, store });

    let app = Router::new()
        .route("/api/health", get(health))
        // Non-POST methods on the task route get the 405 JSON body.
        .route(
            "/api/tasks",
            post(tasks::create_task).fallback(tasks::method_not_allowed),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /api/health - Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
