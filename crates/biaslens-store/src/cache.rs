//! Per-article bias cache: one JSON file per article id.
//!
//! Entries are written once and never invalidated. Writes go to a temporary
//! file in the cache directory and are renamed into place, so a concurrent
//! reader sees either no file or a complete one.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use biaslens_core::{BiasRecord, Error, Result};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::is_safe_file_stem;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-backed `article_id -> BiasRecord` store with an in-memory memo.
pub struct BiasCache {
    dir: PathBuf,
    memo: RwLock<HashMap<String, BiasRecord>>,
}

impl BiasCache {
    /// Open (and create if needed) a cache directory.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            memo: RwLock::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, article_id: &str) -> Option<PathBuf> {
        is_safe_file_stem(article_id).then(|| self.dir.join(format!("{}.json", article_id)))
    }

    /// Record already held in memory, without touching the disk.
    pub fn memoized(&self, article_id: &str) -> Option<BiasRecord> {
        self.memo.read().get(article_id).copied()
    }

    /// Look up a record. Missing, unreadable or corrupt entries are a miss,
    /// as are JSON objects that name no bias type.
    pub fn get(&self, article_id: &str) -> Option<BiasRecord> {
        if let Some(record) = self.memoized(article_id) {
            return Some(record);
        }

        let path = self.path_for(article_id)?;
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Unreadable cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        let record = serde_json::from_str::<serde_json::Value>(&raw)
            .ok()
            .and_then(|v| BiasRecord::from_json_lenient(&v));
        match record {
            Some(record) => {
                debug!("Cache hit for article {}", article_id);
                self.memo.write().insert(article_id.to_string(), record);
                Some(record)
            }
            None => {
                warn!("Corrupt cache entry {}, treating as miss", path.display());
                None
            }
        }
    }

    /// Persist a record. A later `get` for the same id returns an equal value.
    pub fn put(&self, article_id: &str, record: &BiasRecord) -> Result<()> {
        let path = self
            .path_for(article_id)
            .ok_or_else(|| Error::Internal(format!("invalid article id {:?}", article_id)))?;

        let tmp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            article_id,
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let json = serde_json::to_vec_pretty(record)?;
        if let Err(e) = std::fs::write(&tmp, json).and_then(|_| std::fs::rename(&tmp, &path)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(Error::Io(e));
        }

        self.memo.write().insert(article_id.to_string(), *record);
        debug!("Cached bias record for article {}", article_id);
        Ok(())
    }

    /// Number of entries on disk.
    pub fn len_on_disk(&self) -> usize {
        Self::count_entries(&self.dir)
    }

    /// Count `<id>.json` entries in a cache directory without opening it.
    /// In-progress temp files are skipped; a missing directory counts as empty.
    pub fn count_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        let path = e.path();
                        path.extension().is_some_and(|ext| ext == "json")
                            && !e.file_name().to_string_lossy().starts_with('.')
                    })
                    .count()
            })
            .unwrap_or(0)
    }
}
