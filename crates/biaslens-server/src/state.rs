//! Shared application state.

use std::sync::Arc;

use biaslens_classify::{Classifier, LLMConfig, LlmClassifier, PromptTemplate};
use biaslens_core::BiasLensConfig;
use biaslens_enrich::{EnrichmentPipeline, PipelineOptions, QueryService};
use biaslens_metrics::EvaluationReport;
use biaslens_store::{ArticleStore, BiasCache, GraphStore};
use parking_lot::RwLock;
use tracing::{info, warn};

/// Progress of the background evaluation report.
#[derive(Debug, Clone)]
pub enum EvaluationStatus {
    Pending,
    Ready(Arc<EvaluationReport>),
    Failed(String),
}

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: BiasLensConfig,
    pub query: QueryService,
    pub llm_config: LLMConfig,
    pub evaluation: RwLock<EvaluationStatus>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: BiasLensConfig, store: GraphStore, pipeline: EnrichmentPipeline, llm_config: LLMConfig) -> Self {
        let query = QueryService::new(Arc::new(store), Arc::new(pipeline), config.node_limit);
        Self {
            config,
            query,
            llm_config,
            evaluation: RwLock::new(EvaluationStatus::Pending),
            started_at: chrono::Utc::now(),
        }
    }

    /// Load the dataset and wire cache, articles and classifier together.
    ///
    /// Fails only when the dataset cannot be loaded or the cache directory
    /// cannot be opened. A missing prompt template leaves the pipeline
    /// running cache-only.
    pub fn bootstrap(config: BiasLensConfig) -> biaslens_core::Result<Self> {
        let paths = &config.data_paths;
        let store = GraphStore::load_from_path(&paths.dataset)?;
        let cache = Arc::new(BiasCache::open(&paths.bias_cache)?);
        let articles = Arc::new(ArticleStore::new(&paths.articles));
        let llm_config = LLMConfig::load(&paths.llm_config_file);

        let classifier: Option<Arc<dyn Classifier>> = match PromptTemplate::load(&paths.prompt) {
            Ok(template) => {
                let classifier = LlmClassifier::new(llm_config.clone(), template);
                if !classifier.is_configured() {
                    warn!("No LLM API key configured; classification calls will fail");
                }
                Some(Arc::new(classifier))
            }
            Err(e) => {
                warn!("Prompt template unavailable ({}); running cache-only", e);
                None
            }
        };

        let options = PipelineOptions {
            classify_timeout: config.classify_timeout,
            max_concurrency: config.max_concurrency,
        };
        let pipeline = EnrichmentPipeline::new(cache, articles, classifier, options);

        info!(
            "Bias cache at {} holds {} entries",
            paths.bias_cache.display(),
            pipeline.cache().len_on_disk()
        );

        Ok(Self::new(config, store, pipeline, llm_config))
    }

    pub fn evaluation_report(&self) -> Result<Arc<EvaluationReport>, String> {
        match &*self.evaluation.read() {
            EvaluationStatus::Ready(report) => Ok(report.clone()),
            EvaluationStatus::Pending => Err("Evaluation not ready".to_string()),
            EvaluationStatus::Failed(e) => Err(format!("Evaluation failed: {}", e)),
        }
    }
}
