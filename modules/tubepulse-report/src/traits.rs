// Trait boundaries for every network collaborator of the pipeline.
//
// CommentSource: one page of top-level comments per call.
// SentimentBackend: prediction, the three rendered visuals, and insights.
//
// Both are implemented for the real HTTP clients below and for the builder
// mocks in `testing`, so pipeline runs can be exercised without a network.

use anyhow::{Context, Result};
use async_trait::async_trait;

use sentiment_client::SentimentClient;
use tubepulse_common::{
    Comment, ImagePayload, InsightsReport, Prediction, SentimentCounts, SentimentSeriesPoint,
};
use youtube_client::YoutubeClient;

// ---------------------------------------------------------------------------
// CommentSource
// ---------------------------------------------------------------------------

/// A page of flattened comments plus the continuation token, if any.
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub next_page_token: Option<String>,
}

#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Fetch one page. An empty `page_token` requests the first page.
    async fn page(&self, video_id: &str, page_token: &str, max_results: u32)
        -> Result<CommentPage>;
}

#[async_trait]
impl CommentSource for YoutubeClient {
    async fn page(
        &self,
        video_id: &str,
        page_token: &str,
        max_results: u32,
    ) -> Result<CommentPage> {
        let list = self
            .list_comment_threads(video_id, page_token, max_results)
            .await
            .context("commentThreads request failed")?;

        let next_page_token = list.continuation().map(str::to_string);
        let comments = list
            .items
            .iter()
            .map(|thread| {
                let s = thread.top_level();
                Comment::new(s.text_original.clone(), s.published_at.clone(), s.author_id())
            })
            .collect();

        Ok(CommentPage {
            comments,
            next_page_token,
        })
    }
}

// ---------------------------------------------------------------------------
// SentimentBackend
// ---------------------------------------------------------------------------

#[async_trait]
pub trait SentimentBackend: Send + Sync {
    async fn predict_with_timestamps(&self, comments: &[Comment]) -> Result<Vec<Prediction>>;

    async fn generate_chart(&self, counts: &SentimentCounts) -> Result<ImagePayload>;

    async fn generate_trend_graph(&self, series: &[SentimentSeriesPoint]) -> Result<ImagePayload>;

    async fn generate_wordcloud(&self, texts: &[String]) -> Result<ImagePayload>;

    async fn insights(&self, comments: &[Comment]) -> Result<InsightsReport>;
}

#[async_trait]
impl SentimentBackend for SentimentClient {
    async fn predict_with_timestamps(&self, comments: &[Comment]) -> Result<Vec<Prediction>> {
        Ok(SentimentClient::predict_with_timestamps(self, comments).await?)
    }

    async fn generate_chart(&self, counts: &SentimentCounts) -> Result<ImagePayload> {
        Ok(SentimentClient::generate_chart(self, counts).await?)
    }

    async fn generate_trend_graph(&self, series: &[SentimentSeriesPoint]) -> Result<ImagePayload> {
        Ok(SentimentClient::generate_trend_graph(self, series).await?)
    }

    async fn generate_wordcloud(&self, texts: &[String]) -> Result<ImagePayload> {
        Ok(SentimentClient::generate_wordcloud(self, texts).await?)
    }

    async fn insights(&self, comments: &[Comment]) -> Result<InsightsReport> {
        Ok(SentimentClient::insights(self, comments).await?)
    }
}
