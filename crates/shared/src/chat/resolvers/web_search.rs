use tracing::{debug, info, warn};

use super::{LookupOrigin, LookupResult, ResolverFuture, SourceResolver};
use crate::chat::relevance::{RelevanceConfig, relevant_excerpt, visible_text};
use crate::lookup::LookupClient;

/// General web search followed by a best-effort scrape of the top results.
#[derive(Debug, Clone, Default)]
pub struct WebSearchResolver {
    config: RelevanceConfig,
}

impl WebSearchResolver {
    pub fn new(config: RelevanceConfig) -> Self {
        Self { config }
    }

    async fn lookup(&self, client: &dyn LookupClient, query: &str) -> Option<LookupResult> {
        info!(query, "searching the web");

        let urls = match client
            .web_search(query, self.config.search_result_count)
            .await
        {
            Ok(urls) => urls,
            Err(err) => {
                warn!(query, "web search failed: {err}");
                return None;
            }
        };

        for url in urls.iter().take(self.config.max_pages) {
            let html = match client.fetch_page(url).await {
                Ok(html) => html,
                Err(err) => {
                    debug!(query, url = %url, "skipping search result: {err}");
                    continue;
                }
            };

            if let Some(answer) = self.page_answer(&html, query) {
                return Some(LookupResult {
                    answer,
                    source: url.clone(),
                    url: None,
                    origin: LookupOrigin::WebSearch,
                });
            }
            debug!(query, url = %url, "search result has no relevant text");
        }

        None
    }

    fn page_answer(&self, html: &str, query: &str) -> Option<String> {
        let text = visible_text(html);
        if text.chars().count() <= self.config.min_page_chars {
            return None;
        }
        relevant_excerpt(&text, query, &self.config)
    }
}

impl SourceResolver for WebSearchResolver {
    fn origin(&self) -> LookupOrigin {
        LookupOrigin::WebSearch
    }

    fn resolve<'a>(&'a self, client: &'a dyn LookupClient, query: &'a str) -> ResolverFuture<'a> {
        Box::pin(self.lookup(client, query))
    }
}
