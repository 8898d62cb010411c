use std::collections::HashMap;
use std::sync::Mutex;

use super::{LookupClient, LookupError, LookupFuture, PageSummary};

/// Deterministic in-memory `LookupClient`.
///
/// Unknown summaries and pages answer with a 404 status, unknown searches
/// answer with an empty result list. Every call is recorded so callers can
/// assert on the order in which sources were consulted.
#[derive(Debug, Default)]
pub struct StubLookupClient {
    summaries: HashMap<String, PageSummary>,
    title_searches: HashMap<String, Vec<String>>,
    web_results: HashMap<String, Vec<String>>,
    pages: HashMap<String, String>,
    summaries_unreachable: bool,
    calls: Mutex<Vec<String>>,
}

impl StubLookupClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, title: &str, summary: PageSummary) -> Self {
        self.summaries.insert(title.replace(' ', "_"), summary);
        self
    }

    pub fn with_title_search(mut self, query: &str, titles: &[&str]) -> Self {
        self.title_searches.insert(
            query.to_string(),
            titles.iter().map(|title| (*title).to_string()).collect(),
        );
        self
    }

    pub fn with_web_results(mut self, query: &str, urls: &[&str]) -> Self {
        self.web_results.insert(
            query.to_string(),
            urls.iter().map(|url| (*url).to_string()).collect(),
        );
        self
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Makes every summary and title-search call fail at the transport level.
    pub fn with_summaries_unreachable(mut self) -> Self {
        self.summaries_unreachable = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl LookupClient for StubLookupClient {
    fn page_summary<'a>(&'a self, title: &'a str) -> LookupFuture<'a, PageSummary> {
        self.record(format!("summary:{title}"));
        let result = if self.summaries_unreachable {
            Err(LookupError::Transport("connection refused".to_string()))
        } else {
            self.summaries
                .get(title)
                .cloned()
                .ok_or(LookupError::Status(404))
        };
        Box::pin(async move { result })
    }

    fn search_titles<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> LookupFuture<'a, Vec<String>> {
        self.record(format!("titles:{query}"));
        let result = if self.summaries_unreachable {
            Err(LookupError::Transport("connection refused".to_string()))
        } else {
            Ok(self
                .title_searches
                .get(query)
                .map(|titles| titles.iter().take(limit).cloned().collect())
                .unwrap_or_default())
        };
        Box::pin(async move { result })
    }

    fn web_search<'a>(&'a self, query: &'a str, count: usize) -> LookupFuture<'a, Vec<String>> {
        self.record(format!("search:{query}"));
        let urls = self
            .web_results
            .get(query)
            .map(|urls| urls.iter().take(count).cloned().collect())
            .unwrap_or_default();
        Box::pin(async move { Ok(urls) })
    }

    fn fetch_page<'a>(&'a self, url: &'a str) -> LookupFuture<'a, String> {
        self.record(format!("page:{url}"));
        let result = self.pages.get(url).cloned().ok_or(LookupError::Status(404));
        Box::pin(async move { result })
    }
}
