//! Enriched link and view types.

use biaslens_core::{BiasRecord, BiasType};
use biaslens_store::{Link, Node};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One column per bias type; every column is `null` when there is no record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiasColumns(pub Option<BiasRecord>);

impl BiasColumns {
    pub fn get(&self, bias: BiasType) -> Option<f64> {
        self.0.as_ref().and_then(|r| r.get(bias))
    }

    pub fn has_record(&self) -> bool {
        self.0.is_some()
    }
}

impl Serialize for BiasColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(BiasType::COUNT))?;
        for bias in BiasType::ALL {
            map.serialize_entry(bias.name(), &self.get(bias))?;
        }
        map.end()
    }
}

/// A link with its source article's bias scores as flat columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedLink {
    #[serde(flatten)]
    pub link: Link,
    #[serde(flatten)]
    pub bias: BiasColumns,
}

/// The first N nodes and their induced, enriched links.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredView {
    pub nodes: Vec<Node>,
    pub links: Vec<EnrichedLink>,
    /// Links left without a bias record in this computation.
    #[serde(skip)]
    pub gaps: usize,
}

/// Counters for how articles were resolved since startup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentStats {
    #[serde(rename = "cacheHits")]
    pub cache_hits: u64,
    pub classified: u64,
    pub failed: u64,
    #[serde(rename = "timedOut")]
    pub timed_out: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link() -> Link {
        serde_json::from_value(json!({
            "source": "A", "target": "B", "key": 0, "_articleid": "art1", "type": "Event.Aid",
        }))
        .unwrap()
    }

    #[test]
    fn test_enriched_link_has_every_bias_column() {
        for bias in [
            BiasColumns(None),
            BiasColumns(Some(BiasRecord::empty().with(BiasType::Confirmation, 0.8))),
        ] {
            let value = serde_json::to_value(EnrichedLink { link: link(), bias }).unwrap();
            let map = value.as_object().unwrap();
            for t in BiasType::ALL {
                assert!(map.contains_key(t.name()), "missing {}", t);
            }
            assert_eq!(map["source"], json!("A"));
            assert_eq!(map["_articleid"], json!("art1"));
        }
    }

    #[test]
    fn test_no_record_is_null_not_zero() {
        let value = serde_json::to_value(EnrichedLink {
            link: link(),
            bias: BiasColumns(None),
        })
        .unwrap();
        assert!(value["Confirmation Bias"].is_null());

        let value = serde_json::to_value(EnrichedLink {
            link: link(),
            bias: BiasColumns(Some(BiasRecord::filled(0.0))),
        })
        .unwrap();
        assert_eq!(value["Confirmation Bias"], json!(0.0));
    }
}
