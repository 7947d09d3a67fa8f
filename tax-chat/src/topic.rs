use std::fmt;

use serde::Serialize;

/// Broad subject of a message, used to label replies for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Tax,
    Business,
    Superannuation,
    Bookkeeping,
    Payroll,
    General,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tax => "tax",
            Self::Business => "business",
            Self::Superannuation => "superannuation",
            Self::Bookkeeping => "bookkeeping",
            Self::Payroll => "payroll",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Checked in order; the first topic with a matching keyword wins.
const KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Tax, &["tax", "deduction", "return", "ato", "income", "gst"]),
    (Topic::Business, &["business", "company", "structure", "abn"]),
    (Topic::Superannuation, &["super", "superannuation", "retirement", "smsf"]),
    (Topic::Bookkeeping, &["bookkeeping", "accounting", "record", "xero", "myob"]),
    (Topic::Payroll, &["payroll", "salary", "wage", "employee", "payg"]),
];

/// Classifies a message by case-insensitive substring match against the
/// keyword table. Anything unmatched is [`Topic::General`].
pub fn detect_topic(message: &str) -> Topic {
    let lower = message.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map_or(Topic::General, |(topic, _)| *topic)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn detects_each_topic() {
        assert_eq!(detect_topic("When is my tax return due?"), Topic::Tax);
        assert_eq!(detect_topic("Should I set up a company?"), Topic::Business);
        assert_eq!(detect_topic("How does an SMSF work"), Topic::Superannuation);
        assert_eq!(detect_topic("Do you use Xero?"), Topic::Bookkeeping);
        assert_eq!(detect_topic("Processing PAYG for staff"), Topic::Payroll);
    }

    #[test]
    fn unmatched_and_greetings_are_general() {
        assert_eq!(detect_topic("hello there"), Topic::General);
        assert_eq!(detect_topic(""), Topic::General);
    }

    #[test]
    fn earlier_topic_wins_on_overlap() {
        // "gst" and "business" both match; tax is checked first.
        assert_eq!(detect_topic("GST for my business"), Topic::Tax);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Topic::Superannuation).unwrap(), "\"superannuation\"");
    }
}
