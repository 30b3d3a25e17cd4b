//! Stats and hello routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use biaslens_store::BiasCache;

use crate::state::{AppState, EvaluationStatus};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api", get(get_hello))
        .route("/stats", get(get_stats))
}

/// GET /api: liveness probe used by the dashboard.
async fn get_hello() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello World", "api": "Rust" }))
}

/// GET /stats: dataset, cache and enrichment statistics.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let graph = state.query.store().stats();
    let pipeline = state.query.pipeline();
    let cache_dir = pipeline.cache().dir().to_path_buf();
    let cache_entries = tokio::task::spawn_blocking(move || BiasCache::count_entries(&cache_dir))
        .await
        .unwrap_or(0);
    let evaluation = match &*state.evaluation.read() {
        EvaluationStatus::Pending => "pending".to_string(),
        EvaluationStatus::Ready(_) => "ready".to_string(),
        EvaluationStatus::Failed(e) => format!("failed: {}", e),
    };

    Json(serde_json::json!({
        "nodes": graph.node_count,
        "links": graph.link_count,
        "defaultLimit": state.query.default_limit(),
        "cachedViews": state.query.cached_views(),
        "biasCacheEntries": cache_entries,
        "enrichment": pipeline.stats(),
        "classifier": {
            "enabled": pipeline.has_classifier(),
            "llm": state.llm_config.to_response(),
        },
        "evaluation": evaluation,
        "uptimeSecs": (chrono::Utc::now() - state.started_at).num_seconds(),
    }))
}
