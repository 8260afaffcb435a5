use serde::Serialize;

use tubepulse_common::{Comment, SentimentCounts, SentimentSeriesPoint};

/// Body for `/predict_with_timestamps` and `/insights`.
#[derive(Debug, Serialize)]
pub struct CommentsRequest<'a> {
    pub comments: &'a [Comment],
}

/// Body for `/generate_wordcloud`.
#[derive(Debug, Serialize)]
pub struct TextsRequest<'a> {
    pub comments: &'a [String],
}

/// Body for `/generate_chart`.
#[derive(Debug, Serialize)]
pub struct ChartRequest<'a> {
    pub sentiment_counts: &'a SentimentCounts,
}

/// Body for `/generate_trend_graph`.
#[derive(Debug, Serialize)]
pub struct TrendRequest<'a> {
    pub sentiment_data: &'a [SentimentSeriesPoint],
}
