//! The report pipeline: extract → fetch → predict → aggregate → render, then
//! the three visuals, the top-comments list, and insights.
//!
//! Each stage renders before the next one starts, so whatever was appended
//! stays visible when a later stage fails. No stage error escapes `run`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tubepulse_common::Config;

use crate::aggregate::aggregate;
use crate::extractor::extract_video_id;
use crate::fetcher::CommentFetcher;
use crate::guard::{CallOutcome, CancelFlag};
use crate::insights::fetch_insights;
use crate::prediction::predict;
use crate::render;
use crate::stats::RunStats;
use crate::surface::ReportSurface;
use crate::traits::{CommentSource, SentimentBackend};
use crate::visuals::{request_visual, VisualKind};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_comments: usize,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub show_degraded_sections: bool,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_comments: config.max_comments,
            page_size: config.page_size,
            request_timeout: config.request_timeout,
            show_degraded_sections: config.show_degraded_sections,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_comments: 500,
            page_size: 100,
            request_timeout: Duration::from_secs(60),
            show_degraded_sections: false,
        }
    }
}

/// Where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The host supplied no page URL.
    NoActiveUrl,
    /// The URL is not a watch page. No network call was made.
    NotAWatchPage,
    /// Nothing to analyze after the fetch stage.
    NoComments,
    /// Prediction failed. Nothing downstream was requested.
    PredictionFailed,
    Cancelled,
    Completed,
}

#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub stats: RunStats,
}

pub struct Pipeline {
    source: Arc<dyn CommentSource>,
    backend: Arc<dyn SentimentBackend>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn CommentSource>,
        backend: Arc<dyn SentimentBackend>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            backend,
            settings,
        }
    }

    /// Run the whole report for the page at `url`, appending to `surface`.
    pub async fn run(
        &self,
        url: Option<&str>,
        surface: &mut dyn ReportSurface,
        cancel: &CancelFlag,
    ) -> RunReport {
        let mut stats = RunStats::default();
        let outcome = self.execute(url, surface, cancel, &mut stats).await;
        info!(outcome = ?outcome, video_id = ?stats.video_id, "Run finished");
        RunReport { outcome, stats }
    }

    async fn execute(
        &self,
        url: Option<&str>,
        surface: &mut dyn ReportSurface,
        cancel: &CancelFlag,
        stats: &mut RunStats,
    ) -> RunOutcome {
        let timeout = self.settings.request_timeout;
        let show_degraded = self.settings.show_degraded_sections;

        let Some(url) = url else {
            surface.append(render::no_active_url());
            return RunOutcome::NoActiveUrl;
        };
        info!(url, "Active page");

        let Some(video_id) = extract_video_id(url) else {
            info!(url, "Not a watch page, nothing to do");
            surface.append(render::not_a_watch_page());
            return RunOutcome::NotAWatchPage;
        };
        stats.video_id = Some(video_id.to_string());
        surface.append(render::video_section(&video_id));

        // Comments
        let fetched = CommentFetcher::new(
            self.source.as_ref(),
            self.settings.page_size,
            self.settings.max_comments,
            timeout,
        )
        .fetch(video_id.as_str(), cancel)
        .await;
        stats.pages_requested = fetched.pages_requested;
        stats.comments_fetched = fetched.comments.len();
        if cancel.is_cancelled() {
            return RunOutcome::Cancelled;
        }

        let comments = fetched.comments;
        if comments.is_empty() {
            surface.append(render::no_comments());
            return RunOutcome::NoComments;
        }
        surface.append(render::fetched(comments.len()));

        // Predictions
        let Some(predictions) = predict(self.backend.as_ref(), &comments, timeout, cancel).await
        else {
            if cancel.is_cancelled() {
                return RunOutcome::Cancelled;
            }
            surface.append(render::prediction_failed());
            return RunOutcome::PredictionFailed;
        };
        stats.predictions = predictions.len();

        // Summary
        let aggregation = match aggregate(&comments, &predictions) {
            Ok(aggregation) => aggregation,
            Err(e) => {
                warn!(error = %e, "Aggregation skipped");
                surface.append(render::nothing_to_analyze());
                return RunOutcome::NoComments;
            }
        };
        stats.summary = Some(aggregation.summary.clone());
        surface.append(render::summary_section(&aggregation.summary));

        // Visuals
        let texts: Vec<String> = comments.iter().map(|c| c.text.clone()).collect();
        for kind in VisualKind::ALL {
            let outcome = request_visual(
                self.backend.as_ref(),
                kind,
                &aggregation,
                &texts,
                timeout,
                cancel,
            )
            .await;
            if outcome == CallOutcome::Cancelled {
                return RunOutcome::Cancelled;
            }

            let image = outcome.ok();
            if image.is_some() {
                stats.visuals_rendered += 1;
            } else {
                stats.visuals_failed += 1;
            }
            surface.append(render::visual_section(kind, image.as_ref(), show_degraded));
        }

        surface.append(render::top_comments_section(&predictions));

        // Insights
        match fetch_insights(self.backend.as_ref(), &comments, timeout, cancel).await {
            Some(report) => {
                surface.append(render::insights_section(&report));
                surface.append(render::hourly_section(&report.by_hour));
                stats.insights_rendered = true;
            }
            None if cancel.is_cancelled() => return RunOutcome::Cancelled,
            None if show_degraded => surface.append(render::insights_unavailable()),
            None => {}
        }

        RunOutcome::Completed
    }
}
