//! Query service: bounded graph views over the loaded dataset.

use std::collections::HashMap;
use std::sync::Arc;

use biaslens_store::{DatasetMetadata, GraphStore, Node};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::pipeline::EnrichmentPipeline;
use crate::types::{EnrichedLink, FilteredView};

/// Read operations over one process-lifetime dataset.
///
/// A view is memoized per node count only when every link in it carries a
/// bias record. Views with gaps are recomputed on the next request so that
/// later classifications can fill them in.
pub struct QueryService {
    store: Arc<GraphStore>,
    pipeline: Arc<EnrichmentPipeline>,
    default_limit: usize,
    views: RwLock<HashMap<usize, Arc<FilteredView>>>,
}

impl QueryService {
    pub fn new(store: Arc<GraphStore>, pipeline: Arc<EnrichmentPipeline>, default_limit: usize) -> Self {
        Self {
            store,
            pipeline,
            default_limit,
            views: RwLock::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn pipeline(&self) -> &EnrichmentPipeline {
        &self.pipeline
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    fn effective_limit(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.default_limit)
            .min(self.store.node_count())
    }

    /// Raw dataset flags and `graph` object, distinct from the computed view.
    pub fn dataset_metadata(&self) -> &DatasetMetadata {
        self.store.dataset_metadata()
    }

    /// The first `limit` nodes (default limit when `None`).
    pub fn nodes(&self, limit: Option<usize>) -> Vec<Node> {
        let n = self.effective_limit(limit);
        if let Some(view) = self.views.read().get(&n) {
            return view.nodes.clone();
        }
        self.store.first_nodes(n)
    }

    /// Enriched links induced by the first `limit` nodes.
    pub async fn links(&self, limit: Option<usize>) -> Vec<EnrichedLink> {
        self.graph_view(limit).await.links.clone()
    }

    /// Nodes and enriched induced links for the first `limit` nodes.
    pub async fn graph_view(&self, limit: Option<usize>) -> Arc<FilteredView> {
        let n = self.effective_limit(limit);
        if let Some(view) = self.views.read().get(&n) {
            debug!("Reusing graph view for n={}", n);
            return view.clone();
        }

        let (nodes, links) = self.store.subgraph(n);
        let links = self.pipeline.enrich(links).await;
        let gaps = links.iter().filter(|l| !l.bias.has_record()).count();
        let view = Arc::new(FilteredView { nodes, links, gaps });

        info!(
            "Computed graph view n={}: {} nodes, {} links, {} without bias data",
            n,
            view.nodes.len(),
            view.links.len(),
            gaps
        );

        if gaps == 0 {
            self.views.write().insert(n, view.clone());
        }
        view
    }

    /// Number of memoized views.
    pub fn cached_views(&self) -> usize {
        self.views.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{articles, ScriptedClassifier};
    use crate::pipeline::PipelineOptions;
    use biaslens_classify::Classifier;
    use biaslens_core::{BiasRecord, BiasType};
    use biaslens_store::BiasCache;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;

    fn dataset() -> GraphStore {
        GraphStore::from_json(json!({
            "directed": true,
            "multigraph": true,
            "graph": {},
            "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
            "links": [
                {"source": "A", "target": "B", "key": 0, "_articleid": "art1", "type": "Event.Aid"},
                {"source": "B", "target": "C", "key": 0, "_articleid": "art2", "type": "Event.Invest"},
                {"source": "A", "target": "C", "key": 0, "_articleid": "art3", "type": "Event.Aid"},
            ],
        }))
        .unwrap()
    }

    fn service(
        classifier: Arc<ScriptedClassifier>,
        seed: &[(&str, BiasRecord)],
    ) -> (QueryService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(BiasCache::open(dir.path()).unwrap());
        for (id, record) in seed {
            cache.put(id, record).unwrap();
        }
        let classifier: Arc<dyn Classifier> = classifier;
        let pipeline = EnrichmentPipeline::new(
            cache,
            articles(&[("art2", "anchored story"), ("art3", "FAIL")]),
            Some(classifier),
            PipelineOptions::default(),
        );
        let service = QueryService::new(Arc::new(dataset()), Arc::new(pipeline), 100);
        (service, dir)
    }

    fn confirmation_record() -> BiasRecord {
        BiasRecord::filled(0.0).with(BiasType::Confirmation, 0.8)
    }

    #[tokio::test]
    async fn test_two_node_view_uses_cached_record_only() {
        let classifier = Arc::new(ScriptedClassifier::new());
        let (service, _dir) = service(classifier.clone(), &[("art1", confirmation_record())]);

        let view = service.graph_view(Some(2)).await;
        let ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(view.links.len(), 1);

        let link = &view.links[0];
        assert_eq!(link.link.article_id, "art1");
        assert_eq!(link.bias.get(BiasType::Confirmation), Some(0.8));
        for bias in BiasType::ALL.into_iter().filter(|b| *b != BiasType::Confirmation) {
            assert_eq!(link.bias.get(bias), Some(0.0));
        }
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);

        let value = serde_json::to_value(view.as_ref()).unwrap();
        assert_eq!(value["links"][0]["Confirmation Bias"], json!(0.8));
        assert_eq!(value["links"][0]["source"], json!("A"));
        assert_eq!(value["links"][0]["target"], json!("B"));
    }

    #[tokio::test]
    async fn test_full_view_mixes_cached_classified_and_failed() {
        let classifier = Arc::new(ScriptedClassifier::new());
        let (service, _dir) = service(classifier.clone(), &[("art1", confirmation_record())]);

        let view = service.graph_view(Some(3)).await;
        assert_eq!(view.links.len(), 3);
        assert_eq!(view.gaps, 1);

        let by_article: HashMap<&str, &EnrichedLink> = view
            .links
            .iter()
            .map(|l| (l.link.article_id.as_str(), l))
            .collect();
        assert_eq!(by_article["art1"].bias.get(BiasType::Confirmation), Some(0.8));
        assert_eq!(by_article["art2"].bias.get(BiasType::Anchoring), Some(0.5));
        assert!(!by_article["art3"].bias.has_record());

        // Gapped views are not memoized.
        assert_eq!(service.cached_views(), 0);
    }

    #[tokio::test]
    async fn test_complete_views_are_memoized() {
        let classifier = Arc::new(ScriptedClassifier::new());
        let seeded = BiasRecord::filled(0.1);
        let (service, _dir) = service(
            classifier.clone(),
            &[("art1", confirmation_record()), ("art2", seeded), ("art3", seeded)],
        );

        let first = service.graph_view(Some(2)).await;
        let second = service.graph_view(Some(2)).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.cached_views(), 1);

        // Limits beyond the dataset size share the full view.
        let full = service.graph_view(Some(3)).await;
        let oversized = service.graph_view(Some(50)).await;
        assert!(Arc::ptr_eq(&full, &oversized));
        assert_eq!(service.cached_views(), 2);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_nodes_links_and_default_limit() {
        let classifier = Arc::new(ScriptedClassifier::new());
        let (service, _dir) = service(classifier, &[("art1", confirmation_record())]);

        assert_eq!(service.nodes(Some(2)), service.nodes(Some(2)));
        assert_eq!(service.nodes(None).len(), 3);
        assert!(service.nodes(Some(0)).is_empty());

        let chosen: HashSet<String> = service.nodes(Some(2)).into_iter().map(|n| n.id).collect();
        for link in service.links(Some(2)).await {
            assert!(chosen.contains(&link.link.source));
            assert!(chosen.contains(&link.link.target));
        }
        assert!(service.dataset_metadata().directed);
    }
}
