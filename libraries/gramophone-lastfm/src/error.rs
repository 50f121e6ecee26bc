//! Error types for the Last.fm client.

use thiserror::Error;

/// Errors that can occur when talking to Last.fm.
#[derive(Error, Debug)]
pub enum LastFmError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("Last.fm returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// `<lfm status="failed">` body
    #[error("Last.fm error {code}: {message}")]
    Api { code: u32, message: String },

    /// Invalid base URL
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse response body
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Successful response without the expected payload element
    #[error("Response is missing <{0}>")]
    MissingElement(&'static str),
}

impl From<quick_xml::DeError> for LastFmError {
    fn from(err: quick_xml::DeError) -> Self {
        Self::ParseError(err.to_string())
    }
}

/// Result type for Last.fm client operations.
pub type Result<T> = std::result::Result<T, LastFmError>;
