use thiserror::Error;

pub type BrandResult<T> = Result<T, BrandError>;

/// Errors raised outside the tracking path. Tracking calls themselves never
/// fail; these cover configuration, adaptor setup and script replay.
#[derive(Error, Debug)]
pub enum BrandError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Adaptor configuration error: {0}")]
    Adaptor(String),

    #[error("Invalid interaction on line {line}: {reason}")]
    Script { line: usize, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for BrandError {
    fn from(err: config::ConfigError) -> Self {
        BrandError::Config(err.to_string())
    }
}
