//! Typed errors for the ingestion pipeline.
//!
//! Uses `thiserror` for library errors; the binary wraps these with `anyhow`
//! context at the top level.

use thiserror::Error;

/// Errors raised while talking to a source API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Non-2xx response; eligible for retry
    #[error("HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Transport-level failure (DNS, TLS, timeout); eligible for retry
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not valid JSON
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Bounded retry gave up; carries the last underlying failure
    #[error("gave up on {url} after {attempts} attempts: {source}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<FetchError>,
    },
}

/// Errors raised while loading a dataset into the sink.
///
/// Extraction failures never surface here — they are contained per entity
/// type and degrade to empty or partial datasets.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, EtlError>;
