//! BiasLens Store: in-memory node-link graph, on-disk bias cache, article texts.

pub mod articles;
pub mod cache;
pub mod graph;
pub mod types;

pub use articles::{Article, ArticleStore};
pub use cache::BiasCache;
pub use graph::{GraphStats, GraphStore};
pub use types::*;

/// Whether an article id can be used verbatim as a file stem inside a store directory.
pub fn is_safe_file_stem(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
}
