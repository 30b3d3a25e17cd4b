//! Dataset types for the node-link knowledge graph.

use serde::{Deserialize, Deserializer, Serialize};

pub type NodeId = String;

/// A graph node (an entity mentioned in the news corpus).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(deserialize_with = "id_string")]
    pub id: NodeId,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Node {
    /// A node with no attributes, as created for ids only referenced by links.
    pub fn bare(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            attributes: serde_json::Map::new(),
        }
    }
}

/// A directed link ("event") extracted from one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(deserialize_with = "id_string")]
    pub source: NodeId,
    #[serde(deserialize_with = "id_string")]
    pub target: NodeId,
    #[serde(default)]
    pub key: i64,
    #[serde(rename = "_articleid", default, deserialize_with = "id_string")]
    pub article_id: String,
    #[serde(rename = "type", default)]
    pub link_type: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Link {
    /// String attribute lookup (e.g. `_algorithm`, `_raw_source`).
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|v| v.as_str())
    }
}

/// Top-level dataset flags and the raw `graph` metadata object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub directed: bool,
    pub multigraph: bool,
    pub graph: serde_json::Value,
}

/// Accept string or numeric ids; `null` becomes the empty string.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_fields_and_extra_attributes() {
        let link: Link = serde_json::from_value(json!({
            "source": "A",
            "target": "B",
            "key": 2,
            "_articleid": 417,
            "type": "Event.Aid",
            "_algorithm": "ShadGPT",
            "_raw_source": "Haacklee Herald_417",
        }))
        .unwrap();

        assert_eq!(link.article_id, "417");
        assert_eq!(link.key, 2);
        assert_eq!(link.link_type, "Event.Aid");
        assert_eq!(link.attr_str("_algorithm"), Some("ShadGPT"));
        assert!(!link.attributes.contains_key("_articleid"));

        let out = serde_json::to_value(&link).unwrap();
        assert_eq!(out["_articleid"], json!("417"));
        assert_eq!(out["type"], json!("Event.Aid"));
        assert_eq!(out["_raw_source"], json!("Haacklee Herald_417"));
    }

    #[test]
    fn test_link_defaults() {
        let link: Link = serde_json::from_value(json!({"source": 1, "target": 2})).unwrap();
        assert_eq!(link.source, "1");
        assert_eq!(link.key, 0);
        assert_eq!(link.article_id, "");
        assert_eq!(link.link_type, "");
    }

    #[test]
    fn test_node_attributes_flattened() {
        let node: Node = serde_json::from_value(json!({"id": "Oceanus", "type": "Entity.Location"}))
            .unwrap();
        assert_eq!(node.id, "Oceanus");
        assert_eq!(node.attributes["type"], json!("Entity.Location"));
    }
}
