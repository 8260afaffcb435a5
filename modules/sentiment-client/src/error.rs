use thiserror::Error;

pub type Result<T> = std::result::Result<T, SentimentError>;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SentimentError {
    fn from(err: reqwest::Error) -> Self {
        SentimentError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SentimentError {
    fn from(err: serde_json::Error) -> Self {
        SentimentError::Parse(err.to_string())
    }
}
