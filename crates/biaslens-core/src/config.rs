//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Paths to all BiasLens data files and directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Node-link dataset (`data/mc1.json`).
    pub dataset: PathBuf,
    /// Article text files, one `<article_id>.txt` each (`data/articles/`).
    pub articles: PathBuf,
    /// Bias classification cache, one `<article_id>.json` each (`data/bias/`).
    pub bias_cache: PathBuf,
    /// Classification instruction template (`data/prompt.txt`).
    pub prompt: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the cache directory if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let paths = Self::layout(root);
        paths.ensure_dirs()?;
        Ok(paths)
    }

    /// Compute the layout without touching the filesystem.
    pub fn layout(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            dataset: root.join("mc1.json"),
            articles: root.join("articles"),
            bias_cache: root.join("bias"),
            prompt: root.join("prompt.txt"),
            llm_config_file: root.join("llm-config.json"),
            root,
        }
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.bias_cache)?;
        Ok(())
    }
}

/// Top-level BiasLens configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasLensConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Number of nodes in the default graph view.
    pub node_limit: usize,
    /// Upper bound on a single classification call.
    pub classify_timeout: Duration,
    /// Maximum concurrent article resolutions per request.
    pub max_concurrency: usize,
}

impl BiasLensConfig {
    pub const DEFAULT_PORT: u16 = 8000;
    pub const DEFAULT_NODE_LIMIT: usize = 100;
    pub const DEFAULT_CLASSIFY_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = env_parse("PORT").unwrap_or(Self::DEFAULT_PORT);
        let node_limit = env_parse("BIASLENS_NODE_LIMIT").unwrap_or(Self::DEFAULT_NODE_LIMIT);
        let timeout_secs = env_parse("BIASLENS_CLASSIFY_TIMEOUT_SECS")
            .unwrap_or(Self::DEFAULT_CLASSIFY_TIMEOUT_SECS);
        let max_concurrency = env_parse::<usize>("BIASLENS_MAX_CONCURRENCY")
            .unwrap_or(Self::DEFAULT_MAX_CONCURRENCY)
            .max(1);

        Ok(Self {
            port,
            data_paths: DataPaths::new(data_dir)?,
            node_limit,
            classify_timeout: Duration::from_secs(timeout_secs),
            max_concurrency,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_layout() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();
        assert_eq!(paths.dataset, dir.path().join("mc1.json"));
        assert_eq!(paths.articles, dir.path().join("articles"));
        assert!(paths.bias_cache.is_dir());
        // The article directory is user-supplied and never created.
        assert!(!paths.articles.exists());
    }
}
