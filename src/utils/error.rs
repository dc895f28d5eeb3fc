use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("upstream feed returned an empty response")]
    EmptyFeed,

    #[error("upstream returned HTML instead of RSS (possible bot block or redirect); starts with: {snippet}")]
    HtmlResponse { snippet: String },

    #[error("upstream feed is not well-formed XML: {reason}; starts with: {snippet}")]
    FeedParseError { reason: String, snippet: String },

    #[error("Configuration error: {field}: {reason}")]
    ConfigError { field: String, reason: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, FilterError>;
