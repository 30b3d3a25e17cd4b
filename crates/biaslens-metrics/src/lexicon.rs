//! Fixed vocabularies: event-type labels, ground-truth keywords, sentiment words.

/// Human-readable labels for event types.
pub const EDGE_TYPE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Event.Invest", "Investments (e.g., funding or capital deals)"),
    ("Event.Aid", "Aid/Support (e.g., relief or assistance efforts)"),
    ("Event.Transaction", "Transactions (e.g., trades or payments)"),
    ("Event.Fishing.SustainableFishing", "Sustainable Fishing (e.g., eco-friendly fishing)"),
    ("Event.Fishing", "Fishing Activities (e.g., general fishing events)"),
    ("Event.Fishing.OverFishing", "Overfishing (e.g., excessive or illegal fishing)"),
    ("Event.Convicted", "Convictions (e.g., legal guilty verdicts)"),
    ("Event.Applaud", "Praises (e.g., commendations or honors)"),
    ("Event.CertificateIssued", "Certificates Issued (e.g., permits or licenses)"),
    ("Event.Criticize", "Criticisms (e.g., blame or denunciations)"),
    ("Event.Owns.PartiallyOwns", "Ownership (e.g., stakes or shares)"),
    ("Event.Communication.Conference", "Conferences (e.g., meetings or summits)"),
    ("Event.CertificateIssued.Summons", "Summons Issued (e.g., legal notices or citations)"),
];

/// Keywords whose occurrences in an article count as ground truth for an event type.
pub const EDGE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Event.Aid", &["aid", "help", "support", "assistance", "relief"]),
    ("Event.Fishing", &["fish", "fishing", "catch", "harvest", "net"]),
    ("Event.Transaction", &["deal", "trade", "payment", "transaction", "sold", "bought"]),
    (
        "Event.Fishing.OverFishing",
        &["overfish", "illegal fishing", "excessive", "quota exceeded", "unsustainable"],
    ),
    (
        "Event.Fishing.SustainableFishing",
        &["sustainable", "eco-friendly", "responsible fishing", "green fishing"],
    ),
    ("Event.Convicted", &["convict", "guilty", "caught", "sentenced", "fined"]),
    ("Event.Applaud", &["applaud", "praise", "commend", "honor", "celebrate"]),
    ("Event.CertificateIssued", &["certificate", "issued", "permit", "license", "approved"]),
    ("Event.Criticize", &["criticize", "condemn", "blame", "denounce", "fault"]),
    ("Event.Owns.PartiallyOwns", &["owns", "stake", "share", "partially owns", "controls"]),
    (
        "Event.Communication.Conference",
        &["conference", "meeting", "summit", "discussion", "talks"],
    ),
    ("Event.Invest", &["invest", "funding", "capital", "backing", "financed"]),
    (
        "Event.CertificateIssued.Summons",
        &["summons", "citation", "notice", "violation", "order"],
    ),
];

pub const POSITIVE_WORDS: &[&str] = &[
    "praise", "sustainable", "approved", "commend", "honor", "success", "benefit", "great",
    "positive",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "illegal", "guilty", "condemn", "overfish", "violation", "fined", "criticize", "blame",
    "disaster", "fail", "caught", "unsustainable", "excessive", "quota",
];

pub const NEUTRAL_WORDS: &[&str] = &["report", "discuss", "meeting", "conference", "update", "event"];

/// Description for an event type, or the type itself when unknown.
pub fn describe(edge_type: &str) -> &str {
    EDGE_TYPE_DESCRIPTIONS
        .iter()
        .find(|(t, _)| *t == edge_type)
        .map(|(_, d)| *d)
        .unwrap_or(edge_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_falls_back_to_type() {
        assert_eq!(describe("Event.Aid"), "Aid/Support (e.g., relief or assistance efforts)");
        assert_eq!(describe("Event.Unknown"), "Event.Unknown");
    }

    #[test]
    fn test_every_keyword_type_has_a_description() {
        for (edge_type, _) in EDGE_KEYWORDS {
            assert_ne!(describe(edge_type), *edge_type);
        }
    }
}
