//! Classification errors.

use thiserror::Error;

/// Any reason a single article could not be classified.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("No LLM provider configured")]
    NoProvider,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Classification timed out after {0}s")]
    Timeout(u64),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Unparsable model output: {0}")]
    Parse(String),

    #[error("Model output does not match bias schema: {0}")]
    Schema(String),
}

impl From<reqwest::Error> for ClassifyError {
    fn from(e: reqwest::Error) -> Self {
        ClassifyError::Request(e.to_string())
    }
}
