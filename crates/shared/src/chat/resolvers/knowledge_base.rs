use tracing::{debug, info, warn};

use super::{LookupOrigin, LookupResult, ResolverFuture, SourceResolver};
use crate::lookup::{LookupClient, PageSummary};

const DEFAULT_TITLE_SEARCH_LIMIT: usize = 3;
const DEFAULT_SOURCE_LABEL: &str = "Wikipedia";

/// Exact-title summary lookup with a single title-search retry.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseResolver {
    title_search_limit: usize,
}

impl Default for KnowledgeBaseResolver {
    fn default() -> Self {
        Self {
            title_search_limit: DEFAULT_TITLE_SEARCH_LIMIT,
        }
    }
}

impl KnowledgeBaseResolver {
    async fn lookup(&self, client: &dyn LookupClient, query: &str) -> Option<LookupResult> {
        info!(query, "searching knowledge base");

        match client.page_summary(&page_title(query)).await {
            Ok(summary) => {
                if let Some(result) = summary_result(summary, DEFAULT_SOURCE_LABEL) {
                    return Some(result);
                }
                debug!(query, "knowledge-base summary has no extract");
            }
            Err(err) if err.is_miss() => {
                debug!(query, "knowledge-base summary miss: {err}");
            }
            Err(err) => {
                warn!(query, "knowledge-base summary lookup failed: {err}");
                return None;
            }
        }

        let candidates = match client.search_titles(query, self.title_search_limit).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(query, "knowledge-base title search failed: {err}");
                return None;
            }
        };
        let candidate = candidates.into_iter().next()?;

        match client.page_summary(&page_title(&candidate)).await {
            Ok(summary) => summary_result(summary, &candidate),
            Err(err) => {
                debug!(query, candidate = %candidate, "knowledge-base candidate lookup failed: {err}");
                None
            }
        }
    }
}

impl SourceResolver for KnowledgeBaseResolver {
    fn origin(&self) -> LookupOrigin {
        LookupOrigin::KnowledgeBase
    }

    fn resolve<'a>(&'a self, client: &'a dyn LookupClient, query: &'a str) -> ResolverFuture<'a> {
        Box::pin(self.lookup(client, query))
    }
}

fn page_title(query: &str) -> String {
    query.replace(' ', "_")
}

fn summary_result(summary: PageSummary, fallback_source: &str) -> Option<LookupResult> {
    let answer = summary.extract.filter(|extract| !extract.is_empty())?;

    Some(LookupResult {
        answer,
        source: summary
            .title
            .unwrap_or_else(|| fallback_source.to_string()),
        url: summary.page_url.filter(|url| !url.is_empty()),
        origin: LookupOrigin::KnowledgeBase,
    })
}
