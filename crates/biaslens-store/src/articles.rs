//! Article text store: a directory of `<article_id>.txt` files.

use std::path::{Path, PathBuf};

use biaslens_core::Result;
use tracing::{debug, warn};

use crate::is_safe_file_stem;

/// One article file with its full text.
#[derive(Debug, Clone)]
pub struct Article {
    /// File name including the `.txt` extension.
    pub file_name: String,
    /// File stem, i.e. the article id.
    pub article_id: String,
    pub text: String,
}

/// Read-only view of the article directory.
pub struct ArticleStore {
    dir: PathBuf,
}

impl ArticleStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Article text with trailing whitespace stripped from every line.
    /// Returns an empty string when the article is missing or unreadable.
    pub fn content(&self, article_id: &str) -> String {
        if !is_safe_file_stem(article_id) {
            return String::new();
        }
        let path = self.dir.join(format!("{}.txt", article_id));
        match std::fs::read_to_string(&path) {
            Ok(raw) => raw.lines().map(str::trim_end).collect::<Vec<_>>().join("\n"),
            Err(e) => {
                debug!("No article text for {}: {}", article_id, e);
                String::new()
            }
        }
    }

    /// Every `.txt` article in the directory, sorted by file name.
    pub fn all(&self) -> Result<Vec<Article>> {
        let mut articles = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "txt") {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let article_id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            match std::fs::read_to_string(&path) {
                Ok(text) => articles.push(Article {
                    file_name,
                    article_id,
                    text,
                }),
                Err(e) => warn!("Skipping unreadable article {}: {}", path.display(), e),
            }
        }
        articles.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_strips_trailing_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a1.txt"), "First line   \r\nSecond line\t\n").unwrap();
        let store = ArticleStore::new(dir.path());
        assert_eq!(store.content("a1"), "First line\nSecond line");
    }

    #[test]
    fn test_missing_article_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        assert_eq!(store.content("nope"), "");
        assert_eq!(store.content("../etc/passwd"), "");

        let gone = ArticleStore::new(&dir.path().join("missing"));
        assert_eq!(gone.content("a1"), "");
        assert!(gone.all().is_err());
    }

    #[test]
    fn test_all_lists_txt_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b__2.txt"), "beta").unwrap();
        std::fs::write(dir.path().join("a__1.txt"), "alpha").unwrap();
        std::fs::write(dir.path().join("notes.md"), "skip").unwrap();
        let store = ArticleStore::new(dir.path());
        let all = store.all().unwrap();
        let names: Vec<&str> = all.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["a__1.txt", "b__2.txt"]);
        assert_eq!(all[0].article_id, "a__1");
        assert_eq!(all[0].text, "alpha");
    }
}
