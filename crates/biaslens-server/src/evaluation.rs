//! Background evaluation: builds the confusion/Sankey report off the request path.

use std::sync::Arc;

use biaslens_metrics::{EvaluationReport, DEFAULT_ALGORITHMS};
use biaslens_store::ArticleStore;
use tracing::{error, info};

use crate::state::{AppState, EvaluationStatus};

/// Start the background evaluation task.
pub fn start_evaluation_worker(state: Arc<AppState>) {
    tokio::spawn(async move {
        let worker_state = state.clone();
        let outcome = tokio::task::spawn_blocking(move || run_evaluation(&worker_state)).await;
        let status = match outcome {
            Ok(status) => status,
            Err(e) => EvaluationStatus::Failed(format!("evaluation task panicked: {}", e)),
        };
        *state.evaluation.write() = status;
    });
}

/// Compute the report synchronously.
pub fn run_evaluation(state: &AppState) -> EvaluationStatus {
    let articles = ArticleStore::new(&state.config.data_paths.articles);
    match articles.all() {
        Ok(articles) => {
            let links = state.query.store().links().collect::<Vec<_>>();
            let report = EvaluationReport::build(links.iter().copied(), &articles, &DEFAULT_ALGORITHMS);
            info!("Evaluation report ready");
            EvaluationStatus::Ready(Arc::new(report))
        }
        Err(e) => {
            error!(
                "Cannot read articles from {}: {}",
                state.config.data_paths.articles.display(),
                e
            );
            EvaluationStatus::Failed(e.to_string())
        }
    }
}
