//! BiasLens Enrich: attaches per-article bias scores to graph links and
//! serves bounded graph views.
//!
//! Resolution order for every distinct article: bias cache, then the
//! classifier (single attempt, bounded by a timeout), then "no record".
//! A failed article never fails the batch; its bias columns are `null`.

pub mod pipeline;
pub mod query;
pub mod types;

pub use pipeline::{ArticleSource, EnrichmentPipeline, PipelineOptions};
pub use query::QueryService;
pub use types::*;
