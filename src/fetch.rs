//! HTTP fetch layer with bounded retry.
//!
//! Extractors and paginators talk to the [`Fetch`] trait rather than to
//! reqwest directly, so they can be exercised against
//! [`crate::testing::StubFetch`] without network access.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Total attempts per URL, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between attempts.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches one JSON document per call.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// Retrying reqwest-backed client for the source APIs.
///
/// A non-2xx status or transport failure counts as transient and is retried
/// up to [`MAX_ATTEMPTS`] times with a fixed [`RETRY_DELAY`] between
/// attempts. Exhausted retries surface as [`FetchError::Exhausted`].
pub struct ApiClient {
    client: reqwest::Client,
    max_attempts: u32,
    retry_delay: Duration,
}

impl ApiClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        })
    }

    /// Override the retry policy (used to keep tests fast).
    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    async fn get_once(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| FetchError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl Fetch for ApiClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.get_once(url).await {
                Ok(value) => {
                    debug!(url, attempt, "fetched");
                    return Ok(value);
                }
                Err(err) if attempt < self.max_attempts => {
                    warn!(url, attempt, error = %err, "fetch attempt failed, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => {
                    return Err(FetchError::Exhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
            }
        }
    }
}
