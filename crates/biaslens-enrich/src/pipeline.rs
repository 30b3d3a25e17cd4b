//! Enrichment pipeline: cache lookup → classifier fallback → persistence.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use biaslens_classify::{Classifier, ClassifyError};
use biaslens_core::BiasRecord;
use biaslens_store::{is_safe_file_stem, ArticleStore, BiasCache, Link};
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

use crate::types::{BiasColumns, EnrichedLink, EnrichmentStats};

/// Source of raw article text. Missing articles yield an empty string.
pub trait ArticleSource: Send + Sync {
    fn content(&self, article_id: &str) -> String;
}

impl ArticleSource for ArticleStore {
    fn content(&self, article_id: &str) -> String {
        ArticleStore::content(self, article_id)
    }
}

/// Tuning knobs for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Upper bound on a single classifier call.
    pub classify_timeout: Duration,
    /// Maximum articles resolved (and classifier calls in flight) at once.
    pub max_concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            classify_timeout: Duration::from_secs(60),
            max_concurrency: 4,
        }
    }
}

#[derive(Default)]
struct Counters {
    cache_hits: AtomicU64,
    classified: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

/// Resolves bias records for links and reshapes them into columns.
pub struct EnrichmentPipeline {
    cache: Arc<BiasCache>,
    articles: Arc<dyn ArticleSource>,
    classifier: Option<Arc<dyn Classifier>>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
    classify_permits: Semaphore,
    options: PipelineOptions,
    counters: Counters,
}

impl EnrichmentPipeline {
    /// Create a pipeline. Without a classifier, cache misses stay unresolved.
    pub fn new(
        cache: Arc<BiasCache>,
        articles: Arc<dyn ArticleSource>,
        classifier: Option<Arc<dyn Classifier>>,
        options: PipelineOptions,
    ) -> Self {
        let max_concurrency = options.max_concurrency.max(1);
        match &classifier {
            Some(c) => info!("Enrichment pipeline using classifier {}", c.name()),
            None => warn!("Enrichment pipeline has no classifier; cache misses stay empty"),
        }
        Self {
            cache,
            articles,
            classifier,
            in_flight: DashMap::new(),
            classify_permits: Semaphore::new(max_concurrency),
            options: PipelineOptions {
                max_concurrency,
                ..options
            },
            counters: Counters::default(),
        }
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn cache(&self) -> &BiasCache {
        &self.cache
    }

    /// Enrich links, resolving each distinct article once. Output order matches input.
    pub async fn enrich(&self, links: Vec<Link>) -> Vec<EnrichedLink> {
        let article_ids: Vec<String> = {
            let mut seen = HashSet::new();
            links
                .iter()
                .filter(|l| seen.insert(l.article_id.as_str()))
                .map(|l| l.article_id.clone())
                .collect()
        };

        let resolved: HashMap<String, Option<BiasRecord>> = stream::iter(article_ids)
            .map(|id| async move {
                let record = self.resolve(&id).await;
                (id, record)
            })
            .buffer_unordered(self.options.max_concurrency)
            .collect()
            .await;

        links
            .into_iter()
            .map(|link| {
                let record = resolved.get(&link.article_id).copied().flatten();
                EnrichedLink {
                    link,
                    bias: BiasColumns(record),
                }
            })
            .collect()
    }

    /// Resolve one article's bias record, classifying and caching on a miss.
    ///
    /// At most one classification per article id runs at a time; concurrent
    /// callers for the same id wait and then read the cached result.
    pub async fn resolve(&self, article_id: &str) -> Option<BiasRecord> {
        if article_id.is_empty() {
            return None;
        }
        if !is_safe_file_stem(article_id) {
            debug!("Article id {:?} cannot be cached; not classifying", article_id);
            return None;
        }
        if let Some(record) = self.cache_get(article_id).await {
            self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Some(record);
        }

        let slot = self
            .in_flight
            .entry(article_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = slot.lock().await;

        let record = match self.cache_get(article_id).await {
            Some(record) => {
                self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
                Some(record)
            }
            None => self.classify_and_store(article_id).await,
        };

        drop(guard);
        drop(slot);
        self.in_flight
            .remove_if(article_id, |_, slot| Arc::strong_count(slot) == 1);

        record
    }

    /// Cache lookup with the disk read moved off the async executor.
    async fn cache_get(&self, article_id: &str) -> Option<BiasRecord> {
        if let Some(record) = self.cache.memoized(article_id) {
            return Some(record);
        }
        let cache = self.cache.clone();
        let id = article_id.to_string();
        tokio::task::spawn_blocking(move || cache.get(&id))
            .await
            .unwrap_or_else(|e| {
                warn!("Cache read task failed for {}: {}", article_id, e);
                None
            })
    }

    async fn classify_and_store(&self, article_id: &str) -> Option<BiasRecord> {
        let classifier = self.classifier.as_ref()?;

        let articles = self.articles.clone();
        let id = article_id.to_string();
        let text = tokio::task::spawn_blocking(move || articles.content(&id))
            .await
            .unwrap_or_else(|e| {
                warn!("Article read task failed for {}: {}", article_id, e);
                String::new()
            });
        if text.is_empty() {
            warn!("No article text for {}; classifying empty input", article_id);
        }

        let outcome = {
            let _permit = self.classify_permits.acquire().await.ok()?;
            tokio::time::timeout(self.options.classify_timeout, classifier.classify(&text)).await
        };

        let result = match outcome {
            Ok(result) => result,
            Err(_) => {
                self.counters.timed_out.fetch_add(1, Ordering::Relaxed);
                Err(ClassifyError::Timeout(self.options.classify_timeout.as_secs()))
            }
        };

        match result {
            Ok(record) => {
                self.counters.classified.fetch_add(1, Ordering::Relaxed);
                let cache = self.cache.clone();
                let id = article_id.to_string();
                match tokio::task::spawn_blocking(move || cache.put(&id, &record)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("Failed to cache bias record for {}: {}", article_id, e),
                    Err(e) => warn!("Cache write task failed for {}: {}", article_id, e),
                }
                debug!("Classified article {}", article_id);
                Some(record)
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!("Classification failed for article {}: {}", article_id, e);
                None
            }
        }
    }

    pub fn stats(&self) -> EnrichmentStats {
        EnrichmentStats {
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            classified: self.counters.classified.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            timed_out: self.counters.timed_out.load(Ordering::Relaxed),
        }
    }
}
