//! Bias classification through external LLM chat-completion APIs.
//!
//! The [`Classifier`] trait is the seam the enrichment pipeline depends on.
//! [`LlmClassifier`] implements it by sending the prompt template plus the
//! article text to the configured provider and parsing the JSON reply into a
//! [`BiasRecord`](biaslens_core::BiasRecord).

pub mod classifier;
pub mod config;
pub mod error;
pub mod providers;
pub mod types;

pub use classifier::{parse_bias_response, Classifier, LlmClassifier, PromptTemplate};
pub use config::LLMConfig;
pub use error::ClassifyError;
pub use types::*;
