use std::sync::LazyLock;

use regex::Regex;

// Only the canonical watch page is recognized: https, optional www, and `v`
// as the first query parameter. Anything after the 11 id characters is ignored.
static RE_WATCH_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:www\.)?youtube\.com/watch\?v=([A-Za-z0-9_-]{11})").unwrap()
});

/// Canonical 11-character video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video id from a watch-page URL, or `None` if the URL is not one.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    RE_WATCH_PAGE
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
}
