use std::time::Duration;

use tracing::info;
use tubepulse_common::ImagePayload;

use crate::aggregate::Aggregation;
use crate::guard::{guarded, CallOutcome, CancelFlag};
use crate::traits::SentimentBackend;

/// The three rendered artifacts. Independent of each other; a failure in one
/// never affects the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    Chart,
    TrendGraph,
    WordCloud,
}

impl VisualKind {
    /// Report order.
    pub const ALL: [VisualKind; 3] = [
        VisualKind::Chart,
        VisualKind::TrendGraph,
        VisualKind::WordCloud,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            VisualKind::Chart => "generate_chart",
            VisualKind::TrendGraph => "generate_trend_graph",
            VisualKind::WordCloud => "generate_wordcloud",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            VisualKind::Chart => "Sentiment Analysis Results",
            VisualKind::TrendGraph => "Sentiment Trend Over Time",
            VisualKind::WordCloud => "Comment Wordcloud",
        }
    }

    pub fn container_id(self) -> &'static str {
        match self {
            VisualKind::Chart => "chart-container",
            VisualKind::TrendGraph => "trend-graph-container",
            VisualKind::WordCloud => "wordcloud-container",
        }
    }
}

/// Request one visual from its endpoint with the data it is drawn from.
pub async fn request_visual(
    backend: &dyn SentimentBackend,
    kind: VisualKind,
    aggregation: &Aggregation,
    texts: &[String],
    timeout: Duration,
    cancel: &CancelFlag,
) -> CallOutcome<ImagePayload> {
    let outcome = match kind {
        VisualKind::Chart => {
            guarded(
                kind.endpoint(),
                timeout,
                cancel,
                backend.generate_chart(&aggregation.counts),
            )
            .await
        }
        VisualKind::TrendGraph => {
            guarded(
                kind.endpoint(),
                timeout,
                cancel,
                backend.generate_trend_graph(&aggregation.series),
            )
            .await
        }
        VisualKind::WordCloud => {
            guarded(
                kind.endpoint(),
                timeout,
                cancel,
                backend.generate_wordcloud(texts),
            )
            .await
        }
    };

    if let CallOutcome::Success(image) = &outcome {
        info!(
            endpoint = kind.endpoint(),
            bytes = image.bytes.len(),
            mime = image.mime_type.as_str(),
            "Visual received"
        );
    }
    outcome
}
