//! Test doubles for exercising extractors without network access.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::fetch::Fetch;

/// An in-memory [`Fetch`] implementation backed by canned responses.
///
/// Unknown URLs answer 404; URLs registered with [`StubFetch::failing`]
/// answer as if retries were already exhausted.
#[derive(Default)]
pub struct StubFetch {
    responses: HashMap<String, Value>,
    failures: HashSet<String>,
}

impl StubFetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned response for a URL.
    pub fn responding(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), body);
        self
    }

    /// Register a URL that always fails.
    pub fn failing(mut self, url: impl Into<String>) -> Self {
        self.failures.insert(url.into());
        self
    }
}

#[async_trait]
impl Fetch for StubFetch {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        if self.failures.contains(url) {
            return Err(FetchError::Exhausted {
                url: url.to_string(),
                attempts: crate::fetch::MAX_ATTEMPTS,
                source: Box::new(FetchError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    url: url.to_string(),
                }),
            });
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
                url: url.to_string(),
            })
    }
}
