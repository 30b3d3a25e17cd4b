//! Offline check of a data directory before serving it.

use std::path::Path;

use biaslens_core::DataPaths;
use biaslens_store::{ArticleStore, BiasCache, GraphStore};

/// Result of validating a data directory.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub dataset_valid: bool,
    pub nodes: usize,
    pub links: usize,
    /// Links whose `_articleid` is empty.
    pub links_without_article: usize,
    pub articles: usize,
    pub cached_records: usize,
    pub prompt_present: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.dataset_valid && self.errors.is_empty()
    }
}

/// Validate the dataset, article directory, cache and prompt under `data_dir`.
///
/// Read-only: the cache directory is not created when missing.
pub fn validate(data_dir: &Path) -> ValidationReport {
    let paths = DataPaths::layout(data_dir);
    let mut report = ValidationReport::default();

    match GraphStore::load_from_path(&paths.dataset) {
        Ok(store) => {
            report.dataset_valid = true;
            report.nodes = store.node_count();
            report.links = store.link_count();
            report.links_without_article = store.links().filter(|l| l.article_id.is_empty()).count();
        }
        Err(e) => report.errors.push(e.to_string()),
    }

    match ArticleStore::new(&paths.articles).all() {
        Ok(articles) => report.articles = articles.len(),
        Err(e) => report
            .warnings
            .push(format!("Articles unavailable at {}: {}", paths.articles.display(), e)),
    }

    report.cached_records = BiasCache::count_entries(&paths.bias_cache);

    report.prompt_present = paths.prompt.is_file();
    if !report.prompt_present {
        report.warnings.push(format!(
            "Prompt template not found at {}; server would run cache-only",
            paths.prompt.display()
        ));
    }

    if report.links_without_article > 0 {
        report.warnings.push(format!(
            "{} links have no article id and will never carry bias scores",
            report.links_without_article
        ));
    }

    report
}

pub fn print_report(report: &ValidationReport) {
    println!("=== BiasLens Data Validation ===");
    println!();
    println!("Dataset valid:      {}", if report.dataset_valid { "YES" } else { "NO" });
    println!("Nodes:              {}", report.nodes);
    println!("Links:              {}", report.links);
    println!("Articles:           {}", report.articles);
    println!("Cached records:     {}", report.cached_records);
    println!("Prompt template:    {}", if report.prompt_present { "found" } else { "missing" });

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for w in &report.warnings {
            println!("  - {}", w);
        }
    }

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
    }

    println!();
    if report.is_ok() {
        println!("Status: READY TO SERVE");
    } else {
        println!("Status: INVALID");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let report = validate(dir.path());
        assert!(!report.dataset_valid);
        assert!(!report.is_ok());
        assert!(!report.prompt_present);
        assert_eq!(report.cached_records, 0);
    }

    #[test]
    fn test_validate_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("mc1.json"),
            r#"{"directed": true, "multigraph": true, "graph": {},
                "nodes": [{"id": "A"}, {"id": "B"}],
                "links": [{"source": "A", "target": "B", "_articleid": "a1", "type": "Event.Aid"},
                          {"source": "B", "target": "A", "type": "Event.Aid"}]}"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("articles")).unwrap();
        std::fs::write(dir.path().join("articles/a1.txt"), "text").unwrap();
        std::fs::create_dir(dir.path().join("bias")).unwrap();
        std::fs::write(dir.path().join("bias/a1.json"), "{}").unwrap();
        std::fs::write(dir.path().join("bias/.a2.7.0.tmp.json"), "{}").unwrap();

        let report = validate(dir.path());
        assert!(report.is_ok());
        assert_eq!((report.nodes, report.links), (2, 2));
        assert_eq!(report.links_without_article, 1);
        assert_eq!(report.articles, 1);
        assert_eq!(report.cached_records, 1);
    }
}
