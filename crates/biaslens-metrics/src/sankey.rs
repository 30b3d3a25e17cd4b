//! Article sentiment and sentiment → event type → algorithm flow records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::lexicon::{NEGATIVE_WORDS, NEUTRAL_WORDS, POSITIVE_WORDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Lexicon vote: a polarity wins only with a strict majority over both others.
    pub fn infer(text: &str) -> Self {
        let text = text.to_lowercase();
        let present = |words: &[&str]| words.iter().filter(|w| text.contains(*w)).count();
        let pos = present(POSITIVE_WORDS);
        let neg = present(NEGATIVE_WORDS);
        let neu = present(NEUTRAL_WORDS);
        if neg > pos && neg > neu {
            Sentiment::Negative
        } else if pos > neg && pos > neu {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }
}

/// One flow: articles of a sentiment, an event type, and an algorithm's predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyRecord {
    pub sentiment: Sentiment,
    pub edge_type: String,
    pub algorithm: String,
    pub total_count: usize,
    pub tp_count: usize,
    pub fp_count: usize,
}

/// Keep only records whose event type is among the `n` with the most false positives.
///
/// Ties keep the event type that appears first.
pub fn top_by_false_positives(records: &[SankeyRecord], n: usize) -> Vec<SankeyRecord> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let entry = totals.entry(record.edge_type.as_str()).or_insert_with(|| {
            order.push(record.edge_type.as_str());
            0
        });
        *entry += record.fp_count;
    }

    // Stable sort keeps first-appearance order among equal totals.
    order.sort_by(|a, b| totals[b].cmp(&totals[a]));
    order.truncate(n);

    records
        .iter()
        .filter(|r| order.contains(&r.edge_type.as_str()))
        .cloned()
        .collect()
}
