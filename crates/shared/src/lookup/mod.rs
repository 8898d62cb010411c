use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod http;
mod search_results;
mod stub;

pub use http::{HttpLookupClient, HttpLookupConfig};
pub use search_results::parse_search_results;
pub use stub::StubLookupClient;

pub type LookupFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, LookupError>> + Send + 'a>>;

/// Summary of a single knowledge-base page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: Option<String>,
    pub extract: Option<String>,
    pub page_url: Option<String>,
}

impl PageSummary {
    pub fn new(title: impl Into<String>, extract: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            extract: Some(extract.into()),
            page_url: None,
        }
    }

    pub fn with_page_url(mut self, page_url: impl Into<String>) -> Self {
        self.page_url = Some(page_url.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup request timed out")]
    Timeout,
    #[error("lookup transport failed: {0}")]
    Transport(String),
    #[error("lookup returned status {0}")]
    Status(u16),
    #[error("lookup returned an invalid payload: {0}")]
    InvalidPayload(String),
    #[error("lookup url is invalid: {0}")]
    InvalidUrl(String),
}

impl LookupError {
    /// The upstream answered but had nothing for the request.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Status(_))
    }
}

/// External calls the answer pipeline depends on.
pub trait LookupClient: Send + Sync {
    /// Fetches the summary for an exact page title (spaces already replaced by `_`).
    fn page_summary<'a>(&'a self, title: &'a str) -> LookupFuture<'a, PageSummary>;

    /// Returns up to `limit` candidate page titles for a free-text query.
    fn search_titles<'a>(&'a self, query: &'a str, limit: usize)
    -> LookupFuture<'a, Vec<String>>;

    /// Returns up to `count` result URLs from a general web search.
    fn web_search<'a>(&'a self, query: &'a str, count: usize) -> LookupFuture<'a, Vec<String>>;

    /// Fetches the raw markup of an arbitrary page.
    fn fetch_page<'a>(&'a self, url: &'a str) -> LookupFuture<'a, String>;
}
