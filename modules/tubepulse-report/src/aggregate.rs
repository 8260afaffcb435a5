//! Pure aggregation over one run's comments and predictions.
//!
//! Averages divide by the number of comments, not predictions. The two are
//! equal whenever the backend honours its contract.

use std::collections::HashSet;

use tubepulse_common::{
    Comment, Prediction, SentimentCounts, SentimentSeriesPoint, SummaryMetrics, TubePulseError,
};

/// Everything the report and the visual endpoints need from one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub counts: SentimentCounts,
    pub series: Vec<SentimentSeriesPoint>,
    pub summary: SummaryMetrics,
}

pub fn aggregate(
    comments: &[Comment],
    predictions: &[Prediction],
) -> Result<Aggregation, TubePulseError> {
    Ok(Aggregation {
        counts: sentiment_counts(predictions),
        series: sentiment_series(predictions),
        summary: summarize(comments, predictions)?,
    })
}

/// Tally by label. All three labels are present even when zero.
pub fn sentiment_counts(predictions: &[Prediction]) -> SentimentCounts {
    let mut counts = SentimentCounts::default();
    for p in predictions {
        counts.record(p.sentiment);
    }
    counts
}

/// One point per prediction, in prediction order.
pub fn sentiment_series(predictions: &[Prediction]) -> Vec<SentimentSeriesPoint> {
    predictions
        .iter()
        .map(|p| SentimentSeriesPoint {
            timestamp: p.timestamp.clone(),
            sentiment: p.sentiment.score(),
        })
        .collect()
}

pub fn total_sentiment_score(predictions: &[Prediction]) -> i64 {
    predictions.iter().map(|p| i64::from(p.sentiment.score())).sum()
}

pub fn unique_commenters(comments: &[Comment]) -> usize {
    comments
        .iter()
        .map(|c| c.author_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn total_words(comments: &[Comment]) -> usize {
    comments.iter().map(Comment::word_count).sum()
}

/// Rescale an average in [-1, 1] onto [0, 10].
pub fn normalize_sentiment(avg: f64) -> f64 {
    ((avg + 1.0) / 2.0) * 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Headline metrics. Zero comments is an error state, never a NaN.
pub fn summarize(
    comments: &[Comment],
    predictions: &[Prediction],
) -> Result<SummaryMetrics, TubePulseError> {
    let total_comments = comments.len();
    if total_comments == 0 {
        return Err(TubePulseError::ZeroComments);
    }

    let n = total_comments as f64;
    let avg_sentiment = total_sentiment_score(predictions) as f64 / n;

    Ok(SummaryMetrics {
        total_comments,
        unique_commenters: unique_commenters(comments),
        avg_word_length: round2(total_words(comments) as f64 / n),
        avg_sentiment_score: round2(avg_sentiment),
        normalized_sentiment_score: round2(normalize_sentiment(avg_sentiment)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{comment, predictions_for};
    use tubepulse_common::Sentiment::{self, Negative, Neutral, Positive};

    fn three_comments() -> Vec<Comment> {
        vec![
            comment("Loved every minute of this", "UC_a"),
            comment("  great   video ", "UC_b"),
            comment("worst upload yet", "UC_a"),
        ]
    }

    #[test]
    fn two_positive_one_negative() {
        let comments = three_comments();
        let predictions = predictions_for(&comments, &[Positive, Positive, Negative]);

        let agg = aggregate(&comments, &predictions).unwrap();

        assert_eq!(
            agg.counts,
            SentimentCounts {
                positive: 2,
                neutral: 0,
                negative: 1
            }
        );
        assert_eq!(agg.summary.avg_sentiment_score, 0.33);
        assert_eq!(agg.summary.normalized_sentiment_score, 6.67);
    }

    #[test]
    fn counts_always_sum_to_prediction_count() {
        let comments: Vec<Comment> = (0..7).map(|i| comment("x", &format!("UC{i}"))).collect();
        let labels = [Positive, Neutral, Neutral, Negative, Positive, Neutral, Negative];
        let predictions = predictions_for(&comments, &labels);

        let counts = sentiment_counts(&predictions);
        assert_eq!(counts.total() as usize, predictions.len());
        assert_eq!(counts.neutral, 3);

        assert_eq!(sentiment_counts(&[]), SentimentCounts::default());
    }

    #[test]
    fn series_preserves_input_order() {
        let comments = three_comments();
        let mut predictions = predictions_for(&comments, &[Negative, Positive, Neutral]);
        predictions[0].timestamp = Some("2024-05-02T00:00:00Z".into());
        predictions[1].timestamp = Some("2024-05-01T00:00:00Z".into());

        let series = sentiment_series(&predictions);
        let scores: Vec<i8> = series.iter().map(|p| p.sentiment).collect();
        assert_eq!(scores, vec![-1, 1, 0]);
        assert_eq!(series[0].timestamp.as_deref(), Some("2024-05-02T00:00:00Z"));
    }

    #[test]
    fn words_and_commenters() {
        let comments = three_comments();
        assert_eq!(total_words(&comments), 10);
        assert_eq!(unique_commenters(&comments), 2);

        let summary = summarize(&comments, &predictions_for(&comments, &[Neutral; 3])).unwrap();
        assert_eq!(summary.total_comments, 3);
        assert_eq!(summary.avg_word_length, 3.33);
        assert_eq!(summary.avg_sentiment_score, 0.0);
        assert_eq!(summary.normalized_sentiment_score, 5.0);
    }

    #[test]
    fn whitespace_only_comment_has_no_words() {
        let comments = vec![comment(" \n\t ", "UC1"), comment("", "UC2")];
        assert_eq!(total_words(&comments), 0);
    }

    #[test]
    fn zero_comments_is_an_error_state() {
        let err = summarize(&[], &[]).unwrap_err();
        assert!(matches!(err, TubePulseError::ZeroComments));
    }

    #[test]
    fn normalized_score_stays_in_range() {
        for (labels, expected) in [
            (vec![Positive; 4], 10.0),
            (vec![Negative; 4], 0.0),
            (vec![Positive, Negative, Positive, Negative], 5.0),
        ] {
            let comments: Vec<Comment> = (0..labels.len()).map(|_| comment("a b", "UC")).collect();
            let summary = summarize(&comments, &predictions_for(&comments, &labels)).unwrap();
            assert_eq!(summary.normalized_sentiment_score, expected);
        }

        for step in 0..=200 {
            let avg = -1.0 + f64::from(step) / 100.0;
            let n = normalize_sentiment(avg);
            assert!((0.0..=10.0).contains(&n), "{avg} -> {n}");
        }
    }

    #[test]
    fn total_score_uses_enum_mapping() {
        let comments = three_comments();
        let labels: [Sentiment; 3] = [Negative, Negative, Positive];
        assert_eq!(total_sentiment_score(&predictions_for(&comments, &labels)), -1);
    }
}
