//! Full evaluation report: confusion tables, FP rates and Sankey records.

use std::collections::HashSet;

use biaslens_store::{Article, Link};
use serde::Serialize;
use tracing::info;

use crate::confusion::{ground_truth, source_part, ConfusionTable, PredictionIndex};
use crate::lexicon::describe;
use crate::sankey::{top_by_false_positives, SankeyRecord, Sentiment};

/// Number of event types kept by the Sankey endpoint.
pub const SANKEY_TOP_EVENT_TYPES: usize = 5;

/// Evaluation of every configured algorithm over the article corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationReport {
    /// `(algorithm, table)` in configured order.
    pub confusion: Vec<(String, ConfusionTable)>,
    pub sankey: Vec<SankeyRecord>,
}

impl EvaluationReport {
    /// Evaluate `algorithms` on `links` against keyword truth from `articles`.
    pub fn build<'a>(
        links: impl IntoIterator<Item = &'a Link> + Clone,
        articles: &[Article],
        algorithms: &[&str],
    ) -> Self {
        let edge_types = distinct_edge_types(links.clone());
        let predictions = PredictionIndex::build(links);
        let truth = ground_truth(articles);

        let confusion = algorithms
            .iter()
            .map(|algo| {
                let table = ConfusionTable::compute(algo, &edge_types, &truth, &predictions);
                (algo.to_string(), table)
            })
            .collect();

        let mut sankey = Vec::new();
        for article in articles {
            let sentiment = Sentiment::infer(&article.text);
            let part = source_part(&article.file_name);
            let sources = [part.as_str(), article.file_name.as_str()];
            let article_truth = truth.iter().find(|t| t.file_name == article.file_name);

            for et in &edge_types {
                let truth_count = article_truth
                    .and_then(|t| t.counts.get(et).copied())
                    .unwrap_or(0);
                for algo in algorithms {
                    let predicted = predictions.count(algo, &sources, et);
                    if predicted == 0 {
                        continue;
                    }
                    sankey.push(SankeyRecord {
                        sentiment,
                        edge_type: describe(et).to_string(),
                        algorithm: algo.to_string(),
                        total_count: predicted,
                        tp_count: truth_count.min(predicted),
                        fp_count: predicted.saturating_sub(truth_count),
                    });
                }
            }
        }

        info!(
            "Evaluation report: {} articles ({} with keyword truth), {} event types, {} sankey records",
            articles.len(),
            truth.len(),
            edge_types.len(),
            sankey.len()
        );

        Self { confusion, sankey }
    }

    /// `{"<algo>_confusion": {"TP": {...}, "FP": {...}, "FN": {...}}, ...}`
    pub fn confusion_json(&self) -> serde_json::Value {
        self.confusion
            .iter()
            .map(|(algo, table)| {
                let value = serde_json::to_value(table).unwrap_or_default();
                (format!("{}_confusion", algo.to_lowercase()), value)
            })
            .collect::<serde_json::Map<_, _>>()
            .into()
    }

    /// `{"<algo>_fp_rate": {label: rate}, ...}`
    pub fn fp_rates_json(&self) -> serde_json::Value {
        self.confusion
            .iter()
            .map(|(algo, table)| {
                (
                    format!("{}_fp_rate", algo.to_lowercase()),
                    serde_json::Value::Object(table.fp_rates()),
                )
            })
            .collect::<serde_json::Map<_, _>>()
            .into()
    }

    /// Sankey records restricted to the event types with the most false positives.
    pub fn top_sankey(&self) -> Vec<SankeyRecord> {
        top_by_false_positives(&self.sankey, SANKEY_TOP_EVENT_TYPES)
    }
}

/// Event types in order of first appearance.
fn distinct_edge_types<'a>(links: impl IntoIterator<Item = &'a Link>) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|l| seen.insert(l.link_type.clone()))
        .map(|l| l.link_type.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link(algorithm: &str, raw_source: &str, edge_type: &str) -> Link {
        serde_json::from_value(json!({
            "source": "A", "target": "B", "type": edge_type,
            "_algorithm": algorithm, "_raw_source": raw_source,
        }))
        .unwrap()
    }

    fn article(file_name: &str, text: &str) -> Article {
        Article {
            file_name: file_name.into(),
            article_id: file_name.trim_end_matches(".txt").into(),
            text: text.into(),
        }
    }

    #[test]
    fn test_report_end_to_end() {
        let links = vec![
            link("ShadGPT", "h1", "Event.Aid"),
            link("ShadGPT", "h1", "Event.Criticize"),
            link("BassLine", "h1", "Event.Aid"),
            link("BassLine", "h2", "Event.Aid"),
        ];
        let articles = vec![
            article("Herald__h1.txt", "Relief aid was praised as a great success."),
            article("Herald__h2.txt", "Quarterly update."),
        ];
        let report = EvaluationReport::build(&links, &articles, &["ShadGPT", "BassLine"]);

        let aid = "Aid/Support (e.g., relief or assistance efforts)";
        let criticize = "Criticisms (e.g., blame or denunciations)";

        let confusion = report.confusion_json();
        assert_eq!(confusion["shadgpt_confusion"]["TP"][aid], json!(1));
        assert_eq!(confusion["shadgpt_confusion"]["FP"][criticize], json!(1));
        // h2 has no keyword truth, so it does not enter the confusion counts.
        assert_eq!(confusion["bassline_confusion"]["FP"][aid], json!(0));
        assert_eq!(confusion["bassline_confusion"]["FN"][aid], json!(1));

        let rates = report.fp_rates_json();
        assert_eq!(rates["shadgpt_fp_rate"][criticize], json!(1.0));
        assert_eq!(rates["shadgpt_fp_rate"][aid], json!(0.0));

        // h2 still contributes Sankey flows with zero truth.
        let h2_flow = report
            .sankey
            .iter()
            .find(|r| r.algorithm == "BassLine" && r.sentiment == Sentiment::Neutral)
            .unwrap();
        assert_eq!(h2_flow.fp_count, 1);
        assert_eq!(h2_flow.tp_count, 0);

        let positive = report
            .sankey
            .iter()
            .filter(|r| r.sentiment == Sentiment::Positive)
            .count();
        assert_eq!(positive, 3);
        assert_eq!(report.top_sankey().len(), report.sankey.len());
    }
}
