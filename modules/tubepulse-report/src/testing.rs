// Test mocks for the report pipeline.
//
// Two mocks matching the two network boundaries:
// - MockCommentSource (CommentSource): page token → page, failure, or stall
// - MockBackend (SentimentBackend): one scripted reply per endpoint
//
// Both record every call so tests can assert what was (not) contacted.
// Plus helpers for building comments, predictions, images and insights.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use tubepulse_common::{
    Comment, CommenterCount, HourlyPoint, ImagePayload, InsightsReport, InsightsSummary,
    Prediction, ScoredComment, Sentiment, SentimentCounts, SentimentSeriesPoint,
};

use crate::guard::CancelFlag;
use crate::traits::{CommentPage, CommentSource, SentimentBackend};

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Scripted answer for one mocked call.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail(String),
    /// Never resolves. Exercises timeouts and cancellation.
    Stall,
}

impl<T: Clone> Reply<T> {
    async fn resolve(&self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Fail(message) => Err(anyhow!("{message}")),
            Reply::Stall => std::future::pending().await,
        }
    }
}

// ---------------------------------------------------------------------------
// MockCommentSource
// ---------------------------------------------------------------------------

/// Token-keyed comment source. Returns `Err` for unregistered tokens.
/// Builder pattern: `.on_page()`, `.fail_page()`, `.stall_page()`.
pub struct MockCommentSource {
    pages: HashMap<String, Reply<CommentPage>>,
    requests: Mutex<Vec<(String, u32)>>,
}

impl MockCommentSource {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on_page(mut self, token: &str, comments: Vec<Comment>, next: Option<&str>) -> Self {
        let page = CommentPage {
            comments,
            next_page_token: next.map(str::to_string),
        };
        self.pages.insert(token.to_string(), Reply::Ok(page));
        self
    }

    pub fn fail_page(mut self, token: &str, message: &str) -> Self {
        self.pages
            .insert(token.to_string(), Reply::Fail(message.to_string()));
        self
    }

    pub fn stall_page(mut self, token: &str) -> Self {
        self.pages.insert(token.to_string(), Reply::Stall);
        self
    }

    pub fn tokens_requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(token, _)| token.clone())
            .collect()
    }

    pub fn page_sizes_requested(&self) -> Vec<u32> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, size)| *size)
            .collect()
    }
}

impl Default for MockCommentSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentSource for MockCommentSource {
    async fn page(
        &self,
        _video_id: &str,
        page_token: &str,
        max_results: u32,
    ) -> Result<CommentPage> {
        self.requests
            .lock()
            .unwrap()
            .push((page_token.to_string(), max_results));
        match self.pages.get(page_token) {
            Some(reply) => reply.resolve().await,
            None => Err(anyhow!(
                "MockCommentSource: no page registered for token {page_token:?}"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// MockBackend
// ---------------------------------------------------------------------------

pub const PREDICT: &str = "predict_with_timestamps";
pub const CHART: &str = "generate_chart";
pub const TREND: &str = "generate_trend_graph";
pub const WORDCLOUD: &str = "generate_wordcloud";
pub const INSIGHTS: &str = "insights";

/// Scripted sentiment backend. Unconfigured endpoints fail like a 500.
/// Builder pattern: `.predictions()`, `.chart()`, `.insights()`, `.cancel_on()` etc.
pub struct MockBackend {
    predictions: Reply<Vec<Prediction>>,
    chart: Reply<ImagePayload>,
    trend: Reply<ImagePayload>,
    wordcloud: Reply<ImagePayload>,
    insights: Reply<InsightsReport>,
    cancel_on: Option<(&'static str, CancelFlag)>,
    calls: Mutex<Vec<&'static str>>,
    chart_counts: Mutex<Option<SentimentCounts>>,
    trend_series: Mutex<Option<Vec<SentimentSeriesPoint>>>,
    wordcloud_texts: Mutex<Option<Vec<String>>>,
}

fn unconfigured<T>() -> Reply<T> {
    Reply::Fail("API error (status 500): not configured".to_string())
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            predictions: unconfigured(),
            chart: unconfigured(),
            trend: unconfigured(),
            wordcloud: unconfigured(),
            insights: unconfigured(),
            cancel_on: None,
            calls: Mutex::new(Vec::new()),
            chart_counts: Mutex::new(None),
            trend_series: Mutex::new(None),
            wordcloud_texts: Mutex::new(None),
        }
    }

    /// A backend where every endpoint answers successfully.
    pub fn healthy(predictions: Vec<Prediction>) -> Self {
        Self::new()
            .predictions(Reply::Ok(predictions))
            .chart(Reply::Ok(png()))
            .trend(Reply::Ok(png()))
            .wordcloud(Reply::Ok(png()))
            .insights(Reply::Ok(sample_insights()))
    }

    pub fn predictions(mut self, reply: Reply<Vec<Prediction>>) -> Self {
        self.predictions = reply;
        self
    }

    pub fn chart(mut self, reply: Reply<ImagePayload>) -> Self {
        self.chart = reply;
        self
    }

    pub fn trend(mut self, reply: Reply<ImagePayload>) -> Self {
        self.trend = reply;
        self
    }

    pub fn wordcloud(mut self, reply: Reply<ImagePayload>) -> Self {
        self.wordcloud = reply;
        self
    }

    pub fn insights(mut self, reply: Reply<InsightsReport>) -> Self {
        self.insights = reply;
        self
    }

    /// Set `flag` as soon as `endpoint` is called, before it answers.
    pub fn cancel_on(mut self, endpoint: &'static str, flag: CancelFlag) -> Self {
        self.cancel_on = Some((endpoint, flag));
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, endpoint: &str) -> bool {
        self.calls().contains(&endpoint)
    }

    pub fn chart_counts(&self) -> Option<SentimentCounts> {
        *self.chart_counts.lock().unwrap()
    }

    pub fn trend_series(&self) -> Option<Vec<SentimentSeriesPoint>> {
        self.trend_series.lock().unwrap().clone()
    }

    pub fn wordcloud_texts(&self) -> Option<Vec<String>> {
        self.wordcloud_texts.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &'static str) {
        self.calls.lock().unwrap().push(endpoint);
        if let Some((trigger, flag)) = &self.cancel_on {
            if *trigger == endpoint {
                flag.cancel();
            }
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentBackend for MockBackend {
    async fn predict_with_timestamps(&self, _comments: &[Comment]) -> Result<Vec<Prediction>> {
        self.record(PREDICT);
        self.predictions.resolve().await
    }

    async fn generate_chart(&self, counts: &SentimentCounts) -> Result<ImagePayload> {
        self.record(CHART);
        *self.chart_counts.lock().unwrap() = Some(*counts);
        self.chart.resolve().await
    }

    async fn generate_trend_graph(&self, series: &[SentimentSeriesPoint]) -> Result<ImagePayload> {
        self.record(TREND);
        *self.trend_series.lock().unwrap() = Some(series.to_vec());
        self.trend.resolve().await
    }

    async fn generate_wordcloud(&self, texts: &[String]) -> Result<ImagePayload> {
        self.record(WORDCLOUD);
        *self.wordcloud_texts.lock().unwrap() = Some(texts.to_vec());
        self.wordcloud.resolve().await
    }

    async fn insights(&self, _comments: &[Comment]) -> Result<InsightsReport> {
        self.record(INSIGHTS);
        self.insights.resolve().await
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn comment(text: &str, author_id: &str) -> Comment {
    Comment::new(text, "2024-03-01T12:00:00Z", author_id)
}

/// `n` distinct comments from `n` distinct authors.
pub fn comments(n: usize) -> Vec<Comment> {
    (0..n)
        .map(|i| {
            Comment::new(
                format!("comment number {i}"),
                format!("2024-03-01T{:02}:00:00Z", i % 24),
                format!("UC{i}"),
            )
        })
        .collect()
}

/// One prediction per comment, aligned by position, labels cycled if short.
pub fn predictions_for(comments: &[Comment], labels: &[Sentiment]) -> Vec<Prediction> {
    comments
        .iter()
        .zip(labels.iter().cycle())
        .map(|(c, s)| Prediction {
            comment: c.text.clone(),
            sentiment: *s,
            timestamp: Some(c.timestamp.clone()),
        })
        .collect()
}

/// A tiny stand-in for a PNG body.
pub fn png() -> ImagePayload {
    ImagePayload {
        mime_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
    }
}

pub fn sample_insights() -> InsightsReport {
    InsightsReport {
        summary: InsightsSummary {
            total: 12,
            unique_commenters: 9,
            avg_comment_length: 6.25,
            avg_sentiment_score_0_10: 7.5,
        },
        distribution: Some(SentimentCounts {
            positive: 7,
            neutral: 3,
            negative: 2,
        }),
        by_hour: (0..24)
            .map(|h| HourlyPoint {
                h: Some(h),
                y: if h % 2 == 0 { 0.5 } else { -0.25 },
            })
            .collect(),
        top_positive: (0..8)
            .map(|i| ScoredComment {
                text: format!("loved part {i}"),
                score: 1,
            })
            .collect(),
        top_negative: (0..8)
            .map(|i| ScoredComment {
                text: format!("hated part {i}"),
                score: -1,
            })
            .collect(),
        top_words: (0..12).map(|i| format!("w{i}")).collect(),
        top_bigrams: (0..12).map(|i| format!("big ram{i}")).collect(),
        top_commenters: vec![
            CommenterCount {
                author_id: "UC_top".to_string(),
                count: 4,
            },
            CommenterCount {
                author_id: "UC_next".to_string(),
                count: 2,
            },
        ],
    }
}
