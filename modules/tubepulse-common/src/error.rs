use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubePulseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No comments to aggregate")]
    ZeroComments,

    #[error("Unknown sentiment label: {0}")]
    UnknownSentiment(String),
}
