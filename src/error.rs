//! Custom error types for ndtsearch.
//!
//! Library functions return `Result<T, SearchError>`; malformed work records
//! surface as [`ParseError`] so the search driver can count and skip them.

use thiserror::Error;

/// Main error type for ndtsearch operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// External API returned an error
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from API
        message: String,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using `SearchError`
pub type Result<T> = std::result::Result<T, SearchError>;

/// A raw work record that could not be turned into a paper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Record is not shaped like an OpenAlex work
    #[error("malformed record: {0}")]
    Malformed(String),

    /// Record has no source identifier to deduplicate on
    #[error("record has no id")]
    MissingId,

    /// Abstract inverted index holds an unusable position
    #[error("invalid abstract position {0}")]
    AbstractPosition(i64),
}

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| SearchError::Parse(msg.to_string()))
    }
}
