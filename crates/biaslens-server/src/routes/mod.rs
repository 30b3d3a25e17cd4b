//! HTTP route handlers, mounted at the root (the dashboard proxy strips `/api`).

pub mod graph;
pub mod metrics;
pub mod stats;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(graph::routes())
        .merge(metrics::routes())
        .merge(stats::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
