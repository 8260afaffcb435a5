use std::time::Duration;

use tracing::info;
use tubepulse_common::{Comment, InsightsReport};

use crate::guard::{guarded, CancelFlag};
use crate::traits::SentimentBackend;

/// Fetch the backend's insights report. Any failure yields `None`.
pub async fn fetch_insights(
    backend: &dyn SentimentBackend,
    comments: &[Comment],
    timeout: Duration,
    cancel: &CancelFlag,
) -> Option<InsightsReport> {
    let report = guarded("insights", timeout, cancel, backend.insights(comments))
        .await
        .ok()?;
    info!(
        top_words = report.top_words.len(),
        hourly_points = report.by_hour.len(),
        "Insights report received"
    );
    Some(report)
}
