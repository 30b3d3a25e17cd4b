//! Bias taxonomy and the fixed-shape per-article score record.
//!
//! Every article is scored against the same closed set of bias types. A
//! [`BiasRecord`] holds one optional score per type, so "scored as 0" and
//! "no score" stay distinguishable all the way to the JSON output.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One of the fixed bias categories an article is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BiasType {
    Confirmation,
    Anchoring,
    Availability,
    Hindsight,
    Framing,
    ActorObserver,
    FundamentalAttributionError,
    SelfServing,
    HaloEffect,
    BandwagonEffect,
    Authority,
    StatusQuo,
    LossAversion,
    Overconfidence,
    IllusionOfControl,
    GamblersFallacy,
    Positive,
    Negative,
    Emotional,
    SocialDesirability,
    Recency,
    SunkCostFallacy,
    LackOfObjectivity,
    Stereotyping,
    Selection,
    Presentation,
    Information,
    Experiential,
    Linguistic,
    Cultural,
}

impl BiasType {
    /// Number of bias types.
    pub const COUNT: usize = 30;

    /// All bias types in canonical column order.
    pub const ALL: [BiasType; Self::COUNT] = [
        BiasType::Confirmation,
        BiasType::Anchoring,
        BiasType::Availability,
        BiasType::Hindsight,
        BiasType::Framing,
        BiasType::ActorObserver,
        BiasType::FundamentalAttributionError,
        BiasType::SelfServing,
        BiasType::HaloEffect,
        BiasType::BandwagonEffect,
        BiasType::Authority,
        BiasType::StatusQuo,
        BiasType::LossAversion,
        BiasType::Overconfidence,
        BiasType::IllusionOfControl,
        BiasType::GamblersFallacy,
        BiasType::Positive,
        BiasType::Negative,
        BiasType::Emotional,
        BiasType::SocialDesirability,
        BiasType::Recency,
        BiasType::SunkCostFallacy,
        BiasType::LackOfObjectivity,
        BiasType::Stereotyping,
        BiasType::Selection,
        BiasType::Presentation,
        BiasType::Information,
        BiasType::Experiential,
        BiasType::Linguistic,
        BiasType::Cultural,
    ];

    /// Display name, used as the JSON key in cache files and API output.
    pub fn name(self) -> &'static str {
        match self {
            BiasType::Confirmation => "Confirmation Bias",
            BiasType::Anchoring => "Anchoring Bias",
            BiasType::Availability => "Availability Bias",
            BiasType::Hindsight => "Hindsight Bias",
            BiasType::Framing => "Framing Bias",
            BiasType::ActorObserver => "Actor-Observer Bias",
            BiasType::FundamentalAttributionError => "Fundamental Attribution Error Bias",
            BiasType::SelfServing => "Self-Serving Bias",
            BiasType::HaloEffect => "Halo Effect",
            BiasType::BandwagonEffect => "Bandwagon Effect",
            BiasType::Authority => "Authority Bias",
            BiasType::StatusQuo => "Status Quo Bias",
            BiasType::LossAversion => "Loss Aversion Bias",
            BiasType::Overconfidence => "Overconfidence Bias",
            BiasType::IllusionOfControl => "Illusion of Control Bias",
            BiasType::GamblersFallacy => "Gambler's Fallacy Bias",
            BiasType::Positive => "Positive Bias",
            BiasType::Negative => "Negative Bias",
            BiasType::Emotional => "Emotional Bias",
            BiasType::SocialDesirability => "Social Desirability Bias",
            BiasType::Recency => "Recency Bias",
            BiasType::SunkCostFallacy => "Sunk Cost Fallacy",
            BiasType::LackOfObjectivity => "Lack of Objectivity",
            BiasType::Stereotyping => "Stereotyping",
            BiasType::Selection => "Selection Bias",
            BiasType::Presentation => "Presentation Bias",
            BiasType::Information => "Information Bias",
            BiasType::Experiential => "Experiential Bias",
            BiasType::Linguistic => "Linguistic Bias",
            BiasType::Cultural => "Cultural Bias",
        }
    }

    /// Look up a bias type by name, ignoring case, whitespace and punctuation.
    ///
    /// `"Confirmation Bias"`, `"ConfirmationBias"` and `"confirmation-bias"`
    /// all resolve to [`BiasType::Confirmation`].
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|t| normalize(t.name()) == wanted)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BiasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for BiasType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for BiasType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        BiasType::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown bias type: {}", name)))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Per-article scores, one optional value per [`BiasType`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiasRecord {
    scores: [Option<f64>; BiasType::COUNT],
}

/// Why a JSON document could not be read as a complete [`BiasRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    NotAnObject,
    MissingKey(BiasType),
    NonNumeric(BiasType),
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaViolation::NotAnObject => write!(f, "expected a JSON object"),
            SchemaViolation::MissingKey(t) => write!(f, "missing key \"{}\"", t),
            SchemaViolation::NonNumeric(t) => write!(f, "non-numeric score for \"{}\"", t),
        }
    }
}

impl BiasRecord {
    /// A record with every score absent.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, bias: BiasType) -> Option<f64> {
        self.scores[bias.index()]
    }

    pub fn set(&mut self, bias: BiasType, score: Option<f64>) {
        self.scores[bias.index()] = score;
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, bias: BiasType, score: f64) -> Self {
        self.set(bias, Some(score));
        self
    }

    /// A record with every type scored `value`.
    pub fn filled(value: f64) -> Self {
        Self {
            scores: [Some(value); BiasType::COUNT],
        }
    }

    /// Iterate `(type, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (BiasType, Option<f64>)> + '_ {
        BiasType::ALL.iter().map(move |t| (*t, self.get(*t)))
    }

    /// Parse leniently: unknown keys are ignored, missing or non-numeric
    /// scores become `None`. Used for cache files, which may predate the
    /// current taxonomy. Numeric strings are accepted.
    ///
    /// An object naming no bias type at all (an error payload, a foreign
    /// shape) is not a record and yields `None`.
    pub fn from_json_lenient(value: &serde_json::Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut record = Self::empty();
        let mut recognised = 0;
        for (key, score) in map {
            if let Some(bias) = BiasType::from_name(key) {
                record.set(bias, score_of(score));
                recognised += 1;
            }
        }
        (recognised > 0).then_some(record)
    }

    /// Parse strictly: every bias type must be present with a number or null.
    /// Used for classifier output.
    pub fn from_json_strict(value: &serde_json::Value) -> Result<Self, SchemaViolation> {
        let map = value.as_object().ok_or(SchemaViolation::NotAnObject)?;
        let mut record = Self::empty();
        let mut seen = [false; BiasType::COUNT];
        for (key, score) in map {
            let Some(bias) = BiasType::from_name(key) else {
                continue;
            };
            if !score.is_null() && score_of(score).is_none() {
                return Err(SchemaViolation::NonNumeric(bias));
            }
            record.set(bias, score_of(score));
            seen[bias.index()] = true;
        }
        match BiasType::ALL.into_iter().find(|t| !seen[t.index()]) {
            Some(missing) => Err(SchemaViolation::MissingKey(missing)),
            None => Ok(record),
        }
    }
}

fn score_of(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Serialize for BiasRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(BiasType::COUNT))?;
        for (bias, score) in self.iter() {
            map.serialize_entry(bias.name(), &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BiasRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        BiasRecord::from_json_lenient(&value)
            .ok_or_else(|| serde::de::Error::custom("bias record must be a JSON object naming at least one bias type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (i, bias) in BiasType::ALL.iter().enumerate() {
            assert_eq!(bias.index(), i);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = BiasType::ALL.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), BiasType::COUNT);
    }

    #[test]
    fn test_from_name_is_tolerant() {
        assert_eq!(BiasType::from_name("Confirmation Bias"), Some(BiasType::Confirmation));
        assert_eq!(BiasType::from_name("ConfirmationBias"), Some(BiasType::Confirmation));
        assert_eq!(
            BiasType::from_name("gamblers fallacy bias"),
            Some(BiasType::GamblersFallacy)
        );
        assert_eq!(BiasType::from_name("Actor Observer Bias"), Some(BiasType::ActorObserver));
        assert_eq!(BiasType::from_name("Not A Bias"), None);
        assert_eq!(BiasType::from_name(""), None);
    }

    #[test]
    fn test_lenient_parse_ignores_unknown_and_keeps_zero() {
        let value = json!({
            "Confirmation Bias": 0.8,
            "Anchoring Bias": 0,
            "Framing Bias": null,
            "Recency Bias": "0.25",
            "Something Else": 3,
        });
        let record = BiasRecord::from_json_lenient(&value).unwrap();
        assert_eq!(record.get(BiasType::Confirmation), Some(0.8));
        assert_eq!(record.get(BiasType::Anchoring), Some(0.0));
        assert_eq!(record.get(BiasType::Framing), None);
        assert_eq!(record.get(BiasType::Recency), Some(0.25));
        assert_eq!(record.get(BiasType::Cultural), None);

        assert!(BiasRecord::from_json_lenient(&json!([1, 2])).is_none());
        assert!(BiasRecord::from_json_lenient(&json!({"error": "rate limited"})).is_none());
        assert!(BiasRecord::from_json_lenient(&json!({})).is_none());
    }

    #[test]
    fn test_strict_parse_requires_every_key() {
        let full = serde_json::to_value(BiasRecord::filled(0.0)).unwrap();
        assert_eq!(BiasRecord::from_json_strict(&full), Ok(BiasRecord::filled(0.0)));

        let mut partial = full.clone();
        partial.as_object_mut().unwrap().remove("Halo Effect");
        assert_eq!(
            BiasRecord::from_json_strict(&partial),
            Err(SchemaViolation::MissingKey(BiasType::HaloEffect))
        );

        let mut bad = full;
        bad["Stereotyping"] = json!("very");
        assert_eq!(
            BiasRecord::from_json_strict(&bad),
            Err(SchemaViolation::NonNumeric(BiasType::Stereotyping))
        );
    }

    #[test]
    fn test_serialize_emits_every_key() {
        let record = BiasRecord::empty().with(BiasType::Anchoring, 0.5);
        let value = serde_json::to_value(record).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), BiasType::COUNT);
        assert_eq!(map["Anchoring Bias"], json!(0.5));
        assert!(map["Cultural Bias"].is_null());

        let back: BiasRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
