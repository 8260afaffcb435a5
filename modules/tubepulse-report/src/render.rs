use base64::Engine;
use tubepulse_common::{HourlyPoint, ImagePayload, InsightsReport, Prediction, SummaryMetrics};

use crate::extractor::VideoId;
use crate::surface::Fragment;
use crate::visuals::VisualKind;

pub const TOP_COMMENTS: usize = 25;
const TOP_TERMS: usize = 10;
const TOP_EXTREMES: usize = 5;
const SPARKLINE_POINTS: usize = 24;
const SPARKLINE_WIDTH: f64 = 300.0;
const SPARKLINE_HEIGHT: u32 = 60;
const SPARKLINE_MID: f64 = 50.0;

pub const INSIGHTS_TITLE: &str = "Deeper Insights";
pub const HOURLY_TITLE: &str = "Hourly Sentiment (avg)";
pub const SUMMARY_TITLE: &str = "Comment Analysis Summary";
pub const VIDEO_TITLE: &str = "YouTube Video ID";
pub const TOP_COMMENTS_TITLE: &str = "Top 25 Comments with Sentiments";

/// Escape `&`, `<` and `>` only. Ampersands go first so entities are not re-split.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// --- Status messages ---

pub fn no_active_url() -> Fragment {
    Fragment::message("<p>No active tab.</p>")
}

pub fn not_a_watch_page() -> Fragment {
    Fragment::message("<p>Open a YouTube watch page.</p>")
}

pub fn no_comments() -> Fragment {
    Fragment::message("<p>No comments found (quota / restrictions / no public comments).</p>")
}

pub fn nothing_to_analyze() -> Fragment {
    Fragment::message("<p>No comments to analyze.</p>")
}

pub fn fetched(count: usize) -> Fragment {
    Fragment::message(format!(
        "<p>Fetched {count} comments. Performing sentiment analysis…</p>"
    ))
}

pub fn prediction_failed() -> Fragment {
    Fragment::message("<p>Prediction failed. See log.</p>")
}

fn degraded_note(what: &str) -> String {
    format!("<p class=\"degraded\">{what} unavailable.</p>")
}

// --- Sections ---

pub fn video_section(video_id: &VideoId) -> Fragment {
    Fragment::section(
        VIDEO_TITLE,
        &format!(
            "<p>{}</p><p>Fetching comments…</p>",
            escape_html(video_id.as_str())
        ),
    )
}

fn metric(title: &str, value: &str) -> String {
    format!(
        "<div class=\"metric\"><div class=\"metric-title\">{title}</div><div class=\"metric-value\">{value}</div></div>"
    )
}

fn metrics(items: &[String]) -> String {
    format!(
        "<div class=\"metrics-container\">\n    {}\n  </div>",
        items.join("\n    ")
    )
}

pub fn summary_section(summary: &SummaryMetrics) -> Fragment {
    let inner = metrics(&[
        metric("Total Comments", &summary.total_comments.to_string()),
        metric("Unique Commenters", &summary.unique_commenters.to_string()),
        metric(
            "Avg Comment Length",
            &format!("{:.2} words", summary.avg_word_length),
        ),
        metric(
            "Avg Sentiment Score",
            &format!("{:.2}/10", summary.normalized_sentiment_score),
        ),
    ]);
    Fragment::section(SUMMARY_TITLE, &inner)
}

/// Inline `data:` reference for an image payload.
pub fn data_uri(image: &ImagePayload) -> String {
    format!(
        "data:{};base64,{}",
        image.mime_type,
        base64::engine::general_purpose::STANDARD.encode(&image.bytes)
    )
}

/// A visual's section. Without an image the container stays empty, unless
/// degraded notes are enabled.
pub fn visual_section(
    kind: VisualKind,
    image: Option<&ImagePayload>,
    show_degraded: bool,
) -> Fragment {
    let content = match image {
        Some(image) => format!(
            "<img src=\"{}\" style=\"width:100%;margin-top:12px\">",
            data_uri(image)
        ),
        None if show_degraded => degraded_note(kind.title()),
        None => String::new(),
    };

    let lead = match kind {
        VisualKind::Chart => "<p>See the pie chart below for sentiment distribution.</p>",
        _ => "",
    };

    Fragment::section(
        kind.title(),
        &format!(
            "{lead}<div id=\"{}\">{content}</div>",
            kind.container_id()
        ),
    )
}

pub fn top_comments_section(predictions: &[Prediction]) -> Fragment {
    let items: String = predictions
        .iter()
        .take(TOP_COMMENTS)
        .enumerate()
        .map(|(i, p)| {
            format!(
                "<li class=\"comment-item\"><span>{}. {}</span><br>\n           <span class=\"comment-sentiment\">Sentiment: {}</span></li>",
                i + 1,
                escape_html(&p.comment),
                p.sentiment
            )
        })
        .collect();

    Fragment::section(
        TOP_COMMENTS_TITLE,
        &format!("<ul class=\"comment-list\">\n        {items}\n       </ul>"),
    )
}

fn joined_terms(terms: &[String]) -> String {
    terms
        .iter()
        .take(TOP_TERMS)
        .map(|t| escape_html(t))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn insights_section(report: &InsightsReport) -> Fragment {
    let s = &report.summary;
    let summary = metrics(&[
        metric("Unique Commenters", &s.unique_commenters.to_string()),
        metric("Avg Words/Comment", &s.avg_comment_length.to_string()),
        metric("Avg Sentiment", &format!("{}/10", s.avg_sentiment_score_0_10)),
    ]);

    let commenters: String = report
        .top_commenters
        .iter()
        .map(|c| format!("<li>{} &mdash; {}</li>", escape_html(&c.author_id), c.count))
        .collect();
    let best: String = report
        .top_positive
        .iter()
        .take(TOP_EXTREMES)
        .map(|c| format!("<li>👍 {}</li>", escape_html(&c.text)))
        .collect();
    let critical: String = report
        .top_negative
        .iter()
        .take(TOP_EXTREMES)
        .map(|c| format!("<li>👎 {}</li>", escape_html(&c.text)))
        .collect();

    let inner = format!(
        "{summary}\n\
         <div style=\"margin-top:8px\">\n\
         <b>Top keywords</b>: {}<br/>\n\
         <b>Top bigrams</b>: {}\n\
         </div>\n\
         <div style=\"margin-top:12px\">\n\
         <b>Top commenters</b>:\n\
         <ul>{commenters}</ul>\n\
         </div>\n\
         <div style=\"margin-top:12px\">\n\
         <b>Best comments</b>:\n\
         <ul>{best}</ul>\n\
         <b>Critical comments</b>:\n\
         <ul>{critical}</ul>\n\
         </div>",
        joined_terms(&report.top_words),
        joined_terms(&report.top_bigrams),
    );

    Fragment::section(INSIGHTS_TITLE, &inner)
}

/// Shown in place of the insights section only when degraded notes are enabled.
pub fn insights_unavailable() -> Fragment {
    Fragment::section(INSIGHTS_TITLE, &degraded_note(INSIGHTS_TITLE))
}

/// Polyline points for up to 24 hourly averages: x spreads across the width,
/// y maps +1 to the top edge and -1 below it.
pub fn sparkline_points(by_hour: &[HourlyPoint]) -> String {
    let step = SPARKLINE_WIDTH / (SPARKLINE_POINTS - 1) as f64;
    by_hour
        .iter()
        .take(SPARKLINE_POINTS)
        .enumerate()
        .map(|(i, p)| {
            let x = i as f64 * step;
            let y = SPARKLINE_MID - p.y * SPARKLINE_MID;
            format!("{},{}", coord(x), coord(y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn coord(v: f64) -> String {
    let s = format!("{v:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn hourly_section(by_hour: &[HourlyPoint]) -> Fragment {
    let svg = format!(
        "<svg width=\"{}\" height=\"{SPARKLINE_HEIGHT}\"><polyline fill=\"none\" stroke=\"#4fc3f7\" stroke-width=\"2\" points=\"{}\"/></svg>",
        SPARKLINE_WIDTH,
        sparkline_points(by_hour)
    );
    Fragment::section(HOURLY_TITLE, &svg)
}
