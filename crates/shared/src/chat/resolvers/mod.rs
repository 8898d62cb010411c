use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::lookup::LookupClient;

mod knowledge_base;
mod web_search;

pub use knowledge_base::KnowledgeBaseResolver;
pub use web_search::WebSearchResolver;

pub type ResolverFuture<'a> = Pin<Box<dyn Future<Output = Option<LookupResult>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOrigin {
    KnowledgeBase,
    WebSearch,
}

/// An answer produced by one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub answer: String,
    pub source: String,
    pub url: Option<String>,
    pub origin: LookupOrigin,
}

/// Attempts to answer a query from one external source. Failures of any kind
/// are reported as `None`.
pub trait SourceResolver: Send + Sync {
    fn origin(&self) -> LookupOrigin;

    fn resolve<'a>(&'a self, client: &'a dyn LookupClient, query: &'a str) -> ResolverFuture<'a>;
}
