//! Error types for the PageSpeed journey module
//!
//! Transport, decoding and status failures from the scoring service are kept
//! apart only for diagnostics; every one of them aborts the current analysis
//! pass. The "no data" outcome is not an error and never appears here.

/// Error type for tracking, lookup and persistence operations
#[derive(Debug, thiserror::Error)]
pub enum PageSpeedError {
    /// Network failure while talking to the scoring service
    #[error("PageSpeed request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The scoring service answered with a non-success status
    #[error("PageSpeed service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The scoring service answered with a body that is not the expected JSON
    #[error("Malformed PageSpeed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The browser wrapper could not resolve the current page URL
    #[error("Browser error: {0}")]
    Browser(String),

    /// The storage sink rejected an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// A record was added to a store that was never installed
    #[error("Store '{0}' has not been installed")]
    UnknownStore(String),

    /// A context was analysed that the current journey never reported
    #[error("Context '{0}' is not tracked in the current journey")]
    UnknownContext(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for PageSpeedError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<chromiumoxide::error::CdpError> for PageSpeedError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Browser(err.to_string())
    }
}

/// Convenience alias for Result with `PageSpeedError`
pub type PageSpeedResult<T> = Result<T, PageSpeedError>;
