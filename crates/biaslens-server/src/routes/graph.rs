//! Graph view routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use biaslens_enrich::{EnrichedLink, FilteredView};
use biaslens_store::{DatasetMetadata, Node};
use serde::Deserialize;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/nodes", get(get_nodes))
        .route("/links", get(get_links))
        .route("/graph", get(get_graph))
        .route("/metadata", get(get_metadata))
}

/// `?limit=n`; absent means the configured default.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// GET /nodes: the first `limit` nodes.
async fn get_nodes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Node>> {
    Json(state.query.nodes(query.limit))
}

/// GET /links: enriched links induced by the first `limit` nodes.
async fn get_links(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<EnrichedLink>> {
    Json(state.query.links(query.limit).await)
}

/// GET /graph: `{nodes, links}` for the first `limit` nodes.
async fn get_graph(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Json<FilteredView> {
    let view = state.query.graph_view(query.limit).await;
    Json(FilteredView::clone(&view))
}

async fn get_metadata(State(state): State<Arc<AppState>>) -> Json<DatasetMetadata> {
    Json(state.query.dataset_metadata().clone())
}
