pub mod error;
pub mod types;

pub use error::{Result, YoutubeError};
pub use types::{CommentSnippet, CommentThread, CommentThreadList, UNKNOWN_AUTHOR};

use std::time::Duration;

pub struct YoutubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YoutubeClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch one page of top-level comment threads for a video.
    /// Pass an empty `page_token` for the first page.
    pub async fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: &str,
        max_results: u32,
    ) -> Result<CommentThreadList> {
        let url = format!("{}/commentThreads", self.base_url);
        let max_results = max_results.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("videoId", video_id),
                ("maxResults", max_results.as_str()),
                ("pageToken", page_token),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(YoutubeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let page: CommentThreadList = serde_json::from_str(&body)?;
        tracing::debug!(
            video_id,
            items = page.items.len(),
            has_next = page.continuation().is_some(),
            "Fetched comment page"
        );

        Ok(page)
    }
}
