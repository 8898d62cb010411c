use std::sync::Arc;

use tracing::info;

use super::relevance::RelevanceConfig;
use super::resolvers::{
    KnowledgeBaseResolver, LookupOrigin, LookupResult, SourceResolver, WebSearchResolver,
};
use crate::lookup::LookupClient;

/// Runs source resolvers in priority order and returns the first answer.
#[derive(Clone)]
pub struct AnswerResolver {
    client: Arc<dyn LookupClient>,
    resolvers: Arc<[Box<dyn SourceResolver>]>,
}

impl AnswerResolver {
    /// Knowledge base first, then web search.
    pub fn new(client: Arc<dyn LookupClient>, relevance: RelevanceConfig) -> Self {
        Self::with_resolvers(
            client,
            vec![
                Box::new(KnowledgeBaseResolver::default()),
                Box::new(WebSearchResolver::new(relevance)),
            ],
        )
    }

    pub fn with_resolvers(
        client: Arc<dyn LookupClient>,
        resolvers: Vec<Box<dyn SourceResolver>>,
    ) -> Self {
        Self {
            client,
            resolvers: resolvers.into(),
        }
    }

    pub async fn get_answer(&self, query: &str) -> Option<LookupResult> {
        for resolver in self.resolvers.iter() {
            if let Some(result) = resolver.resolve(self.client.as_ref(), query).await {
                info!(query, origin = ?result.origin, "answer resolved");
                return Some(result);
            }
        }

        info!(query, "no source produced an answer");
        None
    }

    /// Consults only the resolvers for one origin.
    pub async fn answer_from(&self, origin: LookupOrigin, query: &str) -> Option<LookupResult> {
        for resolver in self.resolvers.iter().filter(|resolver| resolver.origin() == origin) {
            if let Some(result) = resolver.resolve(self.client.as_ref(), query).await {
                return Some(result);
            }
        }
        None
    }
}
