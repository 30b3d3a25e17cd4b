//! BiasLens Metrics: evaluates the event-extraction algorithms recorded in
//! the dataset against keyword-derived ground truth from the article texts.

pub mod confusion;
pub mod lexicon;
pub mod report;
pub mod sankey;

pub use confusion::{ConfusionCounts, ConfusionTable};
pub use report::EvaluationReport;
pub use sankey::{Sentiment, SankeyRecord};

/// Extraction algorithms evaluated by default.
pub const DEFAULT_ALGORITHMS: [&str; 2] = ["ShadGPT", "BassLine"];
