pub mod error;
pub mod types;

pub use error::{Result, SentimentError};

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tubepulse_common::{
    Comment, ImagePayload, InsightsReport, Prediction, SentimentCounts, SentimentSeriesPoint,
};
use types::{ChartRequest, CommentsRequest, TextsRequest, TrendRequest};

const DEFAULT_IMAGE_MIME: &str = "image/png";

pub struct SentimentClient {
    client: reqwest::Client,
    base_url: String,
}

impl SentimentClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Per-comment sentiment, in the same order as `comments`.
    pub async fn predict_with_timestamps(&self, comments: &[Comment]) -> Result<Vec<Prediction>> {
        let predictions: Vec<Prediction> = self
            .post_json("/predict_with_timestamps", &CommentsRequest { comments })
            .await?;
        tracing::info!(count = predictions.len(), "Predictions received");
        Ok(predictions)
    }

    /// Sentiment distribution pie chart.
    pub async fn generate_chart(&self, counts: &SentimentCounts) -> Result<ImagePayload> {
        self.post_image("/generate_chart", &ChartRequest { sentiment_counts: counts })
            .await
    }

    /// Word cloud over raw comment texts.
    pub async fn generate_wordcloud(&self, texts: &[String]) -> Result<ImagePayload> {
        self.post_image("/generate_wordcloud", &TextsRequest { comments: texts })
            .await
    }

    /// Hourly-resampled sentiment trend line.
    pub async fn generate_trend_graph(
        &self,
        series: &[SentimentSeriesPoint],
    ) -> Result<ImagePayload> {
        self.post_image("/generate_trend_graph", &TrendRequest { sentiment_data: series })
            .await
    }

    pub async fn insights(&self, comments: &[Comment]) -> Result<InsightsReport> {
        self.post_json("/insights", &CommentsRequest { comments })
            .await
    }

    async fn send<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        tracing::debug!(endpoint = path, status = status.as_u16(), "Backend responded");
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SentimentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(path, body).await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn post_image<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ImagePayload> {
        let resp = self.send(path, body).await?;
        let mime_type = image_mime(
            resp.headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );
        let bytes = resp.bytes().await?.to_vec();

        Ok(ImagePayload { mime_type, bytes })
    }
}

/// MIME type for an image response. Anything but a plain `image/<subtype>`
/// made of token characters falls back to `image/png`.
pub fn image_mime(content_type: Option<&str>) -> String {
    content_type
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .filter(|v| is_image_mime(v))
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string()
}

fn is_image_mime(value: &str) -> bool {
    let Some((kind, subtype)) = value.split_once('/') else {
        return false;
    };
    kind == "image"
        && !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_mime_keeps_valid_types() {
        assert_eq!(image_mime(Some("image/png")), "image/png");
        assert_eq!(image_mime(Some("image/svg+xml; charset=utf-8")), "image/svg+xml");
        assert_eq!(image_mime(Some("image/vnd.microsoft.icon")), "image/vnd.microsoft.icon");
    }

    #[test]
    fn image_mime_defaults_when_missing() {
        assert_eq!(image_mime(None), "image/png");
        assert_eq!(image_mime(Some("")), "image/png");
    }

    #[test]
    fn image_mime_rejects_non_images() {
        assert_eq!(image_mime(Some("application/json")), "image/png");
        assert_eq!(image_mime(Some("text/html")), "image/png");
        assert_eq!(image_mime(Some("image/")), "image/png");
    }

    #[test]
    fn image_mime_rejects_attribute_breakout() {
        let mime = image_mime(Some("image/png\" onerror=\"alert(1)"));
        assert_eq!(mime, "image/png");

        let spaced = image_mime(Some("image/png onerror=x"));
        assert_eq!(spaced, "image/png");
        assert!(!image_mime(Some("image/<svg>")).contains('<'));
    }
}
