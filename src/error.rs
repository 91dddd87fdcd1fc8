//! Error types for the searxngr client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, SearxngrError>;

/// Errors that can occur while talking to a SearXNG instance.
///
/// Transport and decode failures are fatal for the current invocation and
/// propagate to the top-level handler in `main`; user-input mistakes are
/// handled locally in the prompt loop and never become a `SearxngrError`.
#[derive(Error, Debug)]
pub enum SearxngrError {
    /// HTTP request failed (connection refused, timeout, TLS, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The instance answered with a non-success status.
    #[error("HTTP status {status} from {url}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Request URL, with query string.
        url: String,
    },

    /// Response body was not valid JSON.
    #[error("Could not decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid or incomplete configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The preferences page could not be parsed.
    #[error("Failed to scrape engine listing: {0}")]
    Scrape(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Terminal or filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
