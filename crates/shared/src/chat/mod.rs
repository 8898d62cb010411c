//! Answer pipeline: canned replies, query extraction, source resolution and
//! response formatting.

mod answer;
mod canned;
mod format;
mod names;
mod query;
mod relevance;
mod resolvers;
mod router;
mod text;

pub use answer::AnswerResolver;
pub use canned::{
    CannedTopic, FACT_REPLIES, GREETING_REPLIES, HELP_REPLY, JOKE_REPLIES, date_reply,
    matched_topic, time_reply,
};
pub use format::{FALLBACK_TIP, SUGGESTED_TOPICS, format_response, format_response_with_rng};
pub use names::{extract_name, is_name_message};
pub use query::extract_query;
pub use relevance::{RelevanceConfig, relevant_excerpt, split_sentences, visible_text};
pub use resolvers::{
    KnowledgeBaseResolver, LookupOrigin, LookupResult, ResolverFuture, SourceResolver,
    WebSearchResolver,
};
pub use router::{
    CONVERSATION_HISTORY_LIMIT, ConversationRouter, ConversationState, ConversationTurn,
    EMPTY_INPUT_REPLY, SHORT_INPUT_REPLY, UNCLEAR_QUERY_REPLY,
};
pub use text::title_case;
