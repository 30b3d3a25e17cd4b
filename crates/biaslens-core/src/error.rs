//! Error types for BiasLens.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
