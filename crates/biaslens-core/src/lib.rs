//! BiasLens Core: bias taxonomy, configuration, error types.

pub mod bias;
pub mod config;
pub mod error;

pub use bias::{BiasRecord, BiasType};
pub use config::{BiasLensConfig, DataPaths};
pub use error::{Error, Result};
