//! Evaluation routes: confusion tables, false-positive rates, Sankey flows.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use biaslens_metrics::EvaluationReport;

use crate::state::AppState;

type ReportResult = Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/confusion", get(get_confusion))
        .route("/fp_rates", get(get_fp_rates))
        .route("/sankey", get(get_sankey))
}

fn with_report(state: &AppState, render: impl FnOnce(&EvaluationReport) -> serde_json::Value) -> ReportResult {
    match state.evaluation_report() {
        Ok(report) => Ok(Json(render(report.as_ref()))),
        Err(message) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": message })),
        )),
    }
}

/// GET /confusion: `{"<algo>_confusion": {"TP": {...}, "FP": {...}, "FN": {...}}}`.
async fn get_confusion(State(state): State<Arc<AppState>>) -> ReportResult {
    with_report(&state, EvaluationReport::confusion_json)
}

/// GET /fp_rates
async fn get_fp_rates(State(state): State<Arc<AppState>>) -> ReportResult {
    with_report(&state, EvaluationReport::fp_rates_json)
}

/// GET /sankey: flows for the five event types with the most false positives.
async fn get_sankey(State(state): State<Arc<AppState>>) -> ReportResult {
    with_report(&state, |report| {
        serde_json::to_value(report.top_sankey()).unwrap_or_default()
    })
}
