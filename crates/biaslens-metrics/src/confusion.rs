//! Keyword ground truth and per-event-type confusion counts.

use std::collections::HashMap;

use biaslens_store::{Article, Link};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::lexicon::{describe, EDGE_KEYWORDS};

/// Ground-truth event counts for one article file.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleTruth {
    pub file_name: String,
    pub counts: HashMap<String, usize>,
}

/// Count keyword hits per event type. Articles without any hit have no truth row.
pub fn ground_truth(articles: &[Article]) -> Vec<ArticleTruth> {
    articles
        .iter()
        .filter_map(|article| {
            let text = article.text.to_lowercase();
            let counts: HashMap<String, usize> = EDGE_KEYWORDS
                .iter()
                .filter_map(|(edge_type, keywords)| {
                    let hits: usize = keywords.iter().map(|kw| text.matches(kw).count()).sum();
                    (hits > 0).then(|| (edge_type.to_string(), hits))
                })
                .collect();
            (!counts.is_empty()).then(|| ArticleTruth {
                file_name: article.file_name.clone(),
                counts,
            })
        })
        .collect()
}

/// The `_raw_source` value links carry for an article file:
/// the part after the last `__`, without `.txt`.
pub fn source_part(file_name: &str) -> String {
    file_name
        .rsplit("__")
        .next()
        .unwrap_or(file_name)
        .replace(".txt", "")
}

/// Predicted event counts indexed by `(algorithm, raw_source)`.
#[derive(Debug, Default)]
pub struct PredictionIndex {
    counts: HashMap<(String, String), HashMap<String, usize>>,
}

impl PredictionIndex {
    pub fn build<'a>(links: impl IntoIterator<Item = &'a Link>) -> Self {
        let mut index = Self::default();
        for link in links {
            let (Some(algorithm), Some(raw_source)) =
                (link.attr_str("_algorithm"), link.attr_str("_raw_source"))
            else {
                continue;
            };
            *index
                .counts
                .entry((algorithm.to_string(), raw_source.to_string()))
                .or_default()
                .entry(link.link_type.clone())
                .or_default() += 1;
        }
        index
    }

    /// Predicted count of `edge_type` by `algorithm` over any of `sources`.
    pub fn count(&self, algorithm: &str, sources: &[&str], edge_type: &str) -> usize {
        let mut unique: Vec<&str> = sources.to_vec();
        unique.dedup();
        unique
            .iter()
            .filter_map(|s| self.counts.get(&(algorithm.to_string(), s.to_string())))
            .filter_map(|types| types.get(edge_type))
            .sum()
    }
}

/// True/false positive and false negative counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    #[serde(rename = "TP")]
    pub tp: usize,
    #[serde(rename = "FP")]
    pub fp: usize,
    #[serde(rename = "FN")]
    pub fn_: usize,
}

impl ConfusionCounts {
    /// Accumulate one (truth, predicted) pair.
    pub fn add(&mut self, truth: usize, predicted: usize) {
        self.tp += truth.min(predicted);
        self.fp += predicted.saturating_sub(truth);
        self.fn_ += truth.saturating_sub(predicted);
    }

    /// FP / (TP + FP), or 0 when nothing was predicted.
    pub fn fp_rate(&self) -> f64 {
        let predicted = self.tp + self.fp;
        if predicted == 0 {
            0.0
        } else {
            self.fp as f64 / predicted as f64
        }
    }
}

/// Confusion counts for one algorithm, one row per event type (by description).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfusionTable {
    pub rows: Vec<(String, ConfusionCounts)>,
}

impl ConfusionTable {
    /// Compare `algorithm`'s predictions against keyword ground truth.
    pub fn compute(
        algorithm: &str,
        edge_types: &[String],
        truth: &[ArticleTruth],
        predictions: &PredictionIndex,
    ) -> Self {
        let mut rows: Vec<(String, ConfusionCounts)> = edge_types
            .iter()
            .map(|et| (describe(et).to_string(), ConfusionCounts::default()))
            .collect();

        for article in truth {
            let part = source_part(&article.file_name);
            for (et, (_, counts)) in edge_types.iter().zip(rows.iter_mut()) {
                let truth_count = article.counts.get(et).copied().unwrap_or(0);
                let predicted = predictions.count(algorithm, &[part.as_str()], et);
                counts.add(truth_count, predicted);
            }
        }

        Self { rows }
    }

    pub fn get(&self, label: &str) -> Option<ConfusionCounts> {
        self.rows.iter().find(|(l, _)| l == label).map(|(_, c)| *c)
    }

    /// `{label: fp_rate}` for every row.
    pub fn fp_rates(&self) -> serde_json::Map<String, serde_json::Value> {
        self.rows
            .iter()
            .map(|(label, counts)| (label.clone(), serde_json::json!(counts.fp_rate())))
            .collect()
    }
}

/// Column-oriented: `{"TP": {label: n}, "FP": {...}, "FN": {...}}`.
impl Serialize for ConfusionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let column = |pick: fn(&ConfusionCounts) -> usize| -> serde_json::Map<String, serde_json::Value> {
            self.rows
                .iter()
                .map(|(label, c)| (label.clone(), serde_json::json!(pick(c))))
                .collect()
        };
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("TP", &column(|c| c.tp))?;
        map.serialize_entry("FP", &column(|c| c.fp))?;
        map.serialize_entry("FN", &column(|c| c.fn_))?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(file_name: &str, text: &str) -> Article {
        Article {
            file_name: file_name.to_string(),
            article_id: file_name.trim_end_matches(".txt").to_string(),
            text: text.to_string(),
        }
    }

    fn link(algorithm: &str, raw_source: &str, edge_type: &str) -> Link {
        serde_json::from_value(json!({
            "source": "A", "target": "B", "type": edge_type,
            "_algorithm": algorithm, "_raw_source": raw_source,
        }))
        .unwrap()
    }

    #[test]
    fn test_ground_truth_counts_keyword_occurrences() {
        let truth = ground_truth(&[
            article("Herald__1.txt", "Aid arrived. More AID and relief followed."),
            article("Herald__2.txt", "Nothing relevant here."),
        ]);
        assert_eq!(truth.len(), 1);
        assert_eq!(truth[0].file_name, "Herald__1.txt");
        assert_eq!(truth[0].counts["Event.Aid"], 3);
    }

    #[test]
    fn test_source_part() {
        assert_eq!(source_part("The Herald__Herald_417.txt"), "Herald_417");
        assert_eq!(source_part("plain.txt"), "plain");
    }

    #[test]
    fn test_confusion_counts_add() {
        let mut c = ConfusionCounts::default();
        c.add(3, 1);
        c.add(1, 4);
        c.add(0, 0);
        assert_eq!(c, ConfusionCounts { tp: 2, fp: 3, fn_: 2 });
        assert!((c.fp_rate() - 0.6).abs() < 1e-9);
        assert_eq!(ConfusionCounts::default().fp_rate(), 0.0);
    }

    #[test]
    fn test_confusion_table_against_truth() {
        let truth = ground_truth(&[article("Herald__h1.txt", "aid aid and a fishing net")]);
        let links = vec![
            link("ShadGPT", "h1", "Event.Aid"),
            link("ShadGPT", "h1", "Event.Invest"),
            link("BassLine", "h1", "Event.Aid"),
            link("ShadGPT", "other", "Event.Aid"),
        ];
        let index = PredictionIndex::build(&links);
        let edge_types = vec!["Event.Aid".to_string(), "Event.Invest".to_string()];

        let shad = ConfusionTable::compute("ShadGPT", &edge_types, &truth, &index);
        let aid = shad.get("Aid/Support (e.g., relief or assistance efforts)").unwrap();
        assert_eq!(aid, ConfusionCounts { tp: 1, fp: 0, fn_: 1 });
        let invest = shad.get("Investments (e.g., funding or capital deals)").unwrap();
        assert_eq!(invest, ConfusionCounts { tp: 0, fp: 1, fn_: 0 });

        let value = serde_json::to_value(&shad).unwrap();
        assert_eq!(value["FP"]["Investments (e.g., funding or capital deals)"], json!(1));
        assert_eq!(shad.fp_rates()["Investments (e.g., funding or capital deals)"], json!(1.0));
    }
}
