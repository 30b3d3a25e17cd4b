//! Read-only node-link graph backed by petgraph.
//!
//! The store is loaded once from a node-link JSON document and never mutated
//! afterwards. Node and edge indices follow document order, which makes the
//! "first N nodes" selection and the induced link order reproducible.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use biaslens_core::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::types::{DatasetMetadata, Link, Node};

const REQUIRED_KEYS: [&str; 5] = ["directed", "multigraph", "graph", "nodes", "links"];

/// In-memory knowledge graph loaded from a node-link document.
pub struct GraphStore {
    graph: DiGraph<Node, Link>,
    node_index: HashMap<String, NodeIndex>,
    metadata: DatasetMetadata,
}

impl GraphStore {
    /// Load and parse a node-link dataset file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let document: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            Error::MalformedDataset(format!("{} is not valid JSON: {}", path.display(), e))
        })?;
        let store = Self::from_json(document)?;
        info!(
            "Loaded dataset {}: {} nodes, {} links",
            path.display(),
            store.node_count(),
            store.link_count()
        );
        Ok(store)
    }

    /// Build a store from an already parsed node-link document.
    pub fn from_json(document: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(mut doc) = document else {
            return Err(Error::MalformedDataset("top level must be an object".into()));
        };

        if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !doc.contains_key(**k)) {
            return Err(Error::MalformedDataset(format!("missing required key `{}`", missing)));
        }

        let directed = read_bool(&doc, "directed")?;
        let multigraph = read_bool(&doc, "multigraph")?;
        let graph_meta = doc.remove("graph").unwrap_or(serde_json::Value::Null);
        let nodes: Vec<Node> = take_array(&mut doc, "nodes")?;
        let links: Vec<Link> = take_array(&mut doc, "links")?;

        let mut store = Self {
            graph: DiGraph::with_capacity(nodes.len(), links.len()),
            node_index: HashMap::with_capacity(nodes.len()),
            metadata: DatasetMetadata {
                directed,
                multigraph,
                graph: graph_meta,
            },
        };

        for node in nodes {
            if let Some(&idx) = store.node_index.get(&node.id) {
                // Repeated ids merge attributes into the first occurrence.
                store.graph[idx].attributes.extend(node.attributes);
                continue;
            }
            let id = node.id.clone();
            let idx = store.graph.add_node(node);
            store.node_index.insert(id, idx);
        }

        for link in links {
            store.add_link(link);
        }

        Ok(store)
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(id) {
            return idx;
        }
        debug!("Adding implicit node {}", id);
        let idx = self.graph.add_node(Node::bare(id));
        self.node_index.insert(id.to_string(), idx);
        idx
    }

    fn add_link(&mut self, link: Link) {
        let a = self.ensure_node(&link.source);
        let b = self.ensure_node(&link.target);
        if !self.metadata.multigraph {
            let existing = if self.metadata.directed {
                self.graph.find_edge(a, b)
            } else {
                self.graph.find_edge_undirected(a, b).map(|(e, _)| e)
            };
            if let Some(edge) = existing {
                self.graph[edge] = link;
                return;
            }
        }
        self.graph.add_edge(a, b, link);
    }

    /// Top-level flags and the raw `graph` object of the dataset.
    pub fn dataset_metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All links in document order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.graph.edge_references().map(|e| e.weight())
    }

    /// The first `n` nodes in document order.
    pub fn first_nodes(&self, n: usize) -> Vec<Node> {
        self.graph.node_weights().take(n).cloned().collect()
    }

    /// Every link whose source and target are both in `node_ids`, in document order.
    pub fn induced_links(&self, node_ids: &HashSet<String>) -> Vec<Link> {
        let members: HashSet<NodeIndex> = node_ids
            .iter()
            .filter_map(|id| self.node_index.get(id).copied())
            .collect();
        self.graph
            .edge_references()
            .filter(|e| members.contains(&e.source()) && members.contains(&e.target()))
            .map(|e| e.weight().clone())
            .collect()
    }

    /// The first `n` nodes together with their induced links.
    pub fn subgraph(&self, n: usize) -> (Vec<Node>, Vec<Link>) {
        let nodes = self.first_nodes(n);
        let ids: HashSet<String> = nodes.iter().map(|node| node.id.clone()).collect();
        let links = self.induced_links(&ids);
        (nodes, links)
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            link_count: self.link_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub link_count: usize,
}

fn read_bool(doc: &serde_json::Map<String, serde_json::Value>, key: &str) -> Result<bool> {
    doc.get(key)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| Error::MalformedDataset(format!("`{}` must be a boolean", key)))
}

fn take_array<T: serde::de::DeserializeOwned>(
    doc: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<Vec<T>> {
    let value = doc.remove(key).unwrap_or(serde_json::Value::Null);
    if !value.is_array() {
        return Err(Error::MalformedDataset(format!("`{}` must be an array", key)));
    }
    serde_json::from_value(value)
        .map_err(|e| Error::MalformedDataset(format!("invalid entry in `{}`: {}", key, e)))
}
