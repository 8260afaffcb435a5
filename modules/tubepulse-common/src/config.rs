use std::time::Duration;

use crate::error::TubePulseError;

const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_SENTIMENT_API_URL: &str = "http://127.0.0.1:5002";
const DEFAULT_MAX_COMMENTS: usize = 500;
const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
/// The comment-source credential is injected here and nowhere else.
#[derive(Debug, Clone)]
pub struct Config {
    // Comment source
    pub youtube_api_key: String,
    pub youtube_api_url: String,

    // Sentiment backend
    pub sentiment_api_url: String,

    // Pagination
    pub max_comments: usize,
    pub page_size: u32,

    // Calls
    pub request_timeout: Duration,

    // Presentation
    pub show_degraded_sections: bool,
}

impl Config {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, TubePulseError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from any key lookup. Absent optional keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TubePulseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let youtube_api_key = lookup("YOUTUBE_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                TubePulseError::Config("YOUTUBE_API_KEY environment variable is required".into())
            })?;

        let page_size: u32 = nonzero_or("COMMENT_PAGE_SIZE", &lookup, DEFAULT_PAGE_SIZE)?;
        let max_comments: usize = nonzero_or("MAX_COMMENTS", &lookup, DEFAULT_MAX_COMMENTS)?;
        let timeout_secs: u64 =
            nonzero_or("REQUEST_TIMEOUT_SECS", &lookup, DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            youtube_api_key,
            youtube_api_url: lookup("YOUTUBE_API_URL")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_URL.to_string()),
            sentiment_api_url: lookup("SENTIMENT_API_URL")
                .unwrap_or_else(|| DEFAULT_SENTIMENT_API_URL.to_string()),
            max_comments,
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
            show_degraded_sections: parse_or("SHOW_DEGRADED_SECTIONS", &lookup, false)?,
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.char_indices().nth(5).map(|(i, _)| i).unwrap_or(val.len());
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  YOUTUBE_API_KEY: {}", preview(&self.youtube_api_key));
        tracing::info!("  YOUTUBE_API_URL: {}", self.youtube_api_url);
        tracing::info!("  SENTIMENT_API_URL: {}", self.sentiment_api_url);
        tracing::info!(
            max_comments = self.max_comments,
            page_size = self.page_size,
            timeout_secs = self.request_timeout.as_secs(),
            show_degraded_sections = self.show_degraded_sections,
            "  Pipeline limits"
        );
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, TubePulseError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| TubePulseError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}

/// Like `parse_or`, but zero is rejected.
fn nonzero_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, TubePulseError>
where
    T: std::str::FromStr + Default + PartialEq,
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(key, lookup, default)?;
    if value == T::default() {
        return Err(TubePulseError::Config(format!("{key} must be at least 1")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup(&[("YOUTUBE_API_KEY", "abc123")])).unwrap();
        assert_eq!(config.youtube_api_key, "abc123");
        assert_eq!(config.sentiment_api_url, "http://127.0.0.1:5002");
        assert_eq!(config.youtube_api_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(config.max_comments, 500);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(!config.show_degraded_sections);
    }

    #[test]
    fn missing_credential_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, TubePulseError::Config(_)));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "k"),
            ("MAX_COMMENTS", "50"),
            ("COMMENT_PAGE_SIZE", "20"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("SHOW_DEGRADED_SECTIONS", "true"),
        ]))
        .unwrap();
        assert_eq!(config.max_comments, 50);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.show_degraded_sections);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "k"),
            ("MAX_COMMENTS", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MAX_COMMENTS"));

        let err = Config::from_lookup(lookup(&[
            ("YOUTUBE_API_KEY", "k"),
            ("COMMENT_PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, TubePulseError::Config(_)));
    }

    #[test]
    fn zero_limits_are_rejected() {
        for key in ["COMMENT_PAGE_SIZE", "MAX_COMMENTS", "REQUEST_TIMEOUT_SECS"] {
            let err = Config::from_lookup(lookup(&[("YOUTUBE_API_KEY", "k"), (key, "0")]))
                .unwrap_err();
            assert!(matches!(err, TubePulseError::Config(_)), "{key}");
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }
}
