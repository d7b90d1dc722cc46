//! One pagination interface, three source protocols.
//!
//! Each source signals "no further page" differently: the creature catalog
//! hands out a full `next` cursor URL, the starship catalog counts page
//! numbers and omits `next` on the last one, and the card catalog returns
//! everything in a single response. All three sit behind [`Paginator`] so
//! the extraction loop and the retry policy are shared.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::FetchError;
use crate::fetch::Fetch;

/// The listing envelope shared by both paginated sources. Anything that
/// fails to match (missing `results`, malformed `next`) reads as the
/// termination signal.
#[derive(Debug, Default, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    results: Option<Vec<Value>>,
}

impl ListEnvelope {
    fn parse(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }
}

/// A source of summary-item pages.
///
/// `next_page` returns `Ok(None)` once the source signals completion. An
/// absent or empty `results` envelope is a completion signal, not an error;
/// fetch failures (after the client's own retries) propagate to the caller,
/// which abandons the entity type.
#[async_trait]
pub trait Paginator: Send {
    async fn next_page(&mut self, client: &dyn Fetch) -> Result<Option<Vec<Value>>, FetchError>;
}

/// Follows the `next` cursor URL embedded in each response envelope.
pub struct CursorPager {
    next_url: Option<String>,
}

impl CursorPager {
    pub fn new(first_url: impl Into<String>) -> Self {
        Self {
            next_url: Some(first_url.into()),
        }
    }
}

#[async_trait]
impl Paginator for CursorPager {
    async fn next_page(&mut self, client: &dyn Fetch) -> Result<Option<Vec<Value>>, FetchError> {
        let Some(url) = self.next_url.take() else {
            return Ok(None);
        };
        let envelope = ListEnvelope::parse(client.get_json(&url).await?);

        let Some(items) = envelope.results.filter(|items| !items.is_empty()) else {
            return Ok(None);
        };
        self.next_url = envelope.next;
        Ok(Some(items))
    }
}

/// Requests `?page=N&limit=…` starting at page 1, stopping when the
/// envelope carries no `next` signal.
pub struct NumberedPager {
    url: String,
    limit: u32,
    page: u64,
    done: bool,
}

impl NumberedPager {
    pub fn new(url: impl Into<String>, limit: u32) -> Self {
        Self {
            url: url.into(),
            limit,
            page: 1,
            done: false,
        }
    }
}

#[async_trait]
impl Paginator for NumberedPager {
    async fn next_page(&mut self, client: &dyn Fetch) -> Result<Option<Vec<Value>>, FetchError> {
        if self.done {
            return Ok(None);
        }
        let url = format!("{}?page={}&limit={}", self.url, self.page, self.limit);
        let envelope = ListEnvelope::parse(client.get_json(&url).await?);

        let Some(items) = envelope.results.filter(|items| !items.is_empty()) else {
            self.done = true;
            return Ok(None);
        };

        if envelope.next.is_none() {
            self.done = true;
        } else {
            self.page += 1;
        }
        Ok(Some(items))
    }
}

/// One bulk fetch; the whole catalog arrives under a single envelope key.
pub struct SinglePage {
    url: String,
    envelope: String,
    done: bool,
}

impl SinglePage {
    pub fn new(url: impl Into<String>, envelope: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            envelope: envelope.into(),
            done: false,
        }
    }
}

#[async_trait]
impl Paginator for SinglePage {
    async fn next_page(&mut self, client: &dyn Fetch) -> Result<Option<Vec<Value>>, FetchError> {
        if self.done {
            return Ok(None);
        }
        self.done = true;
        let body = client.get_json(&self.url).await?;

        match body.get(&self.envelope).and_then(Value::as_array) {
            Some(items) => Ok(Some(items.clone())),
            None => {
                warn!(url = %self.url, envelope = %self.envelope, "response missing envelope key");
                Ok(None)
            }
        }
    }
}
