use serde::{Deserialize, Serialize};

use crate::error::TubePulseError;

// --- Comments ---

/// A top-level public comment as retrieved from the comment source.
/// Duplicates (same author, same text) are legal and never collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub timestamp: String,
    #[serde(rename = "authorId")]
    pub author_id: String,
}

impl Comment {
    pub fn new(
        text: impl Into<String>,
        timestamp: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            timestamp: timestamp.into(),
            author_id: author_id.into(),
        }
    }

    /// Number of whitespace-delimited, non-empty tokens in the text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

// --- Sentiment ---

/// Three-valued sentiment label. On the wire it travels as `"-1"`, `"0"` or `"1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    pub fn score(self) -> i8 {
        match self {
            Sentiment::Negative => -1,
            Sentiment::Neutral => 0,
            Sentiment::Positive => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Negative => "-1",
            Sentiment::Neutral => "0",
            Sentiment::Positive => "1",
        }
    }

    /// Parse a wire label. Numeric labels are canonical; the textual class
    /// names some models emit are accepted case-insensitively.
    pub fn from_label(label: &str) -> Result<Self, TubePulseError> {
        match label.trim() {
            "-1" => Ok(Sentiment::Negative),
            "0" => Ok(Sentiment::Neutral),
            "1" => Ok(Sentiment::Positive),
            other => match other.to_ascii_lowercase().as_str() {
                "negative" => Ok(Sentiment::Negative),
                "neutral" => Ok(Sentiment::Neutral),
                "positive" => Ok(Sentiment::Positive),
                _ => Err(TubePulseError::UnknownSentiment(other.to_string())),
            },
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for Sentiment {
    type Error = TubePulseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Sentiment::from_label(&value)
    }
}

impl From<Sentiment> for String {
    fn from(value: Sentiment) -> Self {
        value.label().to_string()
    }
}

/// Per-comment prediction, positionally aligned with the submitted comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub comment: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Tally of predictions per label. Serializes as `{"1": n, "0": m, "-1": k}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "1", default)]
    pub positive: u32,
    #[serde(rename = "0", default)]
    pub neutral: u32,
    #[serde(rename = "-1", default)]
    pub negative: u32,
}

impl SentimentCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.neutral + self.negative
    }
}

/// One point of the sentiment trend series, in prediction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSeriesPoint {
    pub timestamp: Option<String>,
    pub sentiment: i8,
}

/// Headline numbers for one run. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_comments: usize,
    pub unique_commenters: usize,
    pub avg_word_length: f64,
    pub avg_sentiment_score: f64,
    pub normalized_sentiment_score: f64,
}

// --- Rendered artifacts ---

/// Opaque binary image returned by a visualization endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

// --- Insights report (computed by the backend) ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsightsSummary {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub unique_commenters: usize,
    #[serde(default)]
    pub avg_comment_length: f64,
    #[serde(default)]
    pub avg_sentiment_score_0_10: f64,
}

/// Average sentiment for one hour of the day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyPoint {
    #[serde(default)]
    pub h: Option<u32>,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredComment {
    pub text: String,
    #[serde(default)]
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommenterCount {
    #[serde(rename = "authorId")]
    pub author_id: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InsightsReport {
    #[serde(default)]
    pub summary: InsightsSummary,
    #[serde(default)]
    pub distribution: Option<SentimentCounts>,
    #[serde(default)]
    pub by_hour: Vec<HourlyPoint>,
    #[serde(default)]
    pub top_positive: Vec<ScoredComment>,
    #[serde(default)]
    pub top_negative: Vec<ScoredComment>,
    #[serde(default)]
    pub top_words: Vec<String>,
    #[serde(default)]
    pub top_bigrams: Vec<String>,
    #[serde(default)]
    pub top_commenters: Vec<CommenterCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_labels_map_both_ways() {
        for s in [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive] {
            assert_eq!(Sentiment::from_label(s.label()).unwrap(), s);
        }
        assert_eq!(Sentiment::Negative.score(), -1);
        assert_eq!(Sentiment::Neutral.score(), 0);
        assert_eq!(Sentiment::Positive.score(), 1);
    }

    #[test]
    fn textual_labels_are_accepted() {
        assert_eq!(Sentiment::from_label("Positive").unwrap(), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("NEGATIVE").unwrap(), Sentiment::Negative);
        assert!(Sentiment::from_label("2").is_err());
        assert!(Sentiment::from_label("").is_err());
    }

    #[test]
    fn prediction_array_parses_from_backend_json() {
        let body = r#"[
            {"comment": "great", "sentiment": "1", "timestamp": "2024-01-01T10:00:00Z"},
            {"comment": "meh", "sentiment": "0", "timestamp": null},
            {"comment": "bad", "sentiment": "-1"}
        ]"#;
        let preds: Vec<Prediction> = serde_json::from_str(body).unwrap();
        assert_eq!(preds.len(), 3);
        assert_eq!(preds[0].sentiment, Sentiment::Positive);
        assert_eq!(preds[1].timestamp, None);
        assert_eq!(preds[2].sentiment, Sentiment::Negative);
    }

    #[test]
    fn unknown_sentiment_fails_the_whole_array() {
        let body = r#"[{"comment": "x", "sentiment": "maybe", "timestamp": "t"}]"#;
        assert!(serde_json::from_str::<Vec<Prediction>>(body).is_err());
    }

    #[test]
    fn counts_serialize_with_label_keys() {
        let mut counts = SentimentCounts::default();
        counts.record(Sentiment::Positive);
        counts.record(Sentiment::Positive);
        counts.record(Sentiment::Negative);
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json, serde_json::json!({"1": 2, "0": 0, "-1": 1}));
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn comment_serializes_author_in_camel_case() {
        let c = Comment::new("hi there", "2024-01-01T00:00:00Z", "UC123");
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["authorId"], "UC123");
        assert_eq!(c.word_count(), 2);
    }

    #[test]
    fn sparse_insights_report_defaults_missing_fields() {
        let body = r#"{"summary": {"unique_commenters": 4}, "top_words": ["video"]}"#;
        let report: InsightsReport = serde_json::from_str(body).unwrap();
        assert_eq!(report.summary.unique_commenters, 4);
        assert_eq!(report.top_words, vec!["video".to_string()]);
        assert!(report.by_hour.is_empty());
        assert!(report.distribution.is_none());
    }
}
