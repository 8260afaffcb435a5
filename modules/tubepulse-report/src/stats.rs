use tubepulse_common::SummaryMetrics;

/// Stats from one pipeline run.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub video_id: Option<String>,
    pub pages_requested: u32,
    pub comments_fetched: usize,
    pub predictions: usize,
    pub visuals_rendered: u32,
    pub visuals_failed: u32,
    pub insights_rendered: bool,
    pub summary: Option<SummaryMetrics>,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== TubePulse Run ===")?;
        writeln!(
            f,
            "Video:              {}",
            self.video_id.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "Pages requested:    {}", self.pages_requested)?;
        writeln!(f, "Comments fetched:   {}", self.comments_fetched)?;
        writeln!(f, "Predictions:        {}", self.predictions)?;
        writeln!(f, "Visuals rendered:   {}", self.visuals_rendered)?;
        writeln!(f, "Visuals failed:     {}", self.visuals_failed)?;
        writeln!(
            f,
            "Insights:           {}",
            if self.insights_rendered { "rendered" } else { "omitted" }
        )?;
        if let Some(s) = &self.summary {
            writeln!(f, "\nSummary:")?;
            writeln!(f, "  Unique commenters: {}", s.unique_commenters)?;
            writeln!(f, "  Avg words:         {:.2}", s.avg_word_length)?;
            writeln!(f, "  Avg sentiment:     {:.2}", s.avg_sentiment_score)?;
            writeln!(f, "  Score (0-10):      {:.2}", s.normalized_sentiment_score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_summary_when_present() {
        let stats = RunStats {
            video_id: Some("dQw4w9WgXcQ".into()),
            comments_fetched: 3,
            summary: Some(SummaryMetrics {
                total_comments: 3,
                unique_commenters: 2,
                avg_word_length: 4.0,
                avg_sentiment_score: 0.33,
                normalized_sentiment_score: 6.67,
            }),
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("dQw4w9WgXcQ"));
        assert!(text.contains("Score (0-10):      6.67"));
        assert!(text.contains("Insights:           omitted"));
    }
}
