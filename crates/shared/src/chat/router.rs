use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::answer::AnswerResolver;
use super::canned::canned_reply;
use super::format::format_response;
use super::query::extract_query;

pub const CONVERSATION_HISTORY_LIMIT: usize = 50;

pub const EMPTY_INPUT_REPLY: &str = "Please type a question!";
pub const SHORT_INPUT_REPLY: &str = "Ask me a specific question! 😊";
pub const UNCLEAR_QUERY_REPLY: &str = "I'm not sure what you're asking. Try being more specific!";

const SHORT_INPUT_MAX_WORDS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_text: String,
    pub bot_text: String,
    pub timestamp: String,
}

impl ConversationTurn {
    pub fn new(user_text: &str, bot_text: &str, at: DateTime<Local>) -> Self {
        Self {
            user_text: user_text.to_string(),
            bot_text: bot_text.to_string(),
            timestamp: at.format("%H:%M").to_string(),
        }
    }
}

/// Per-session conversation memory. Oldest turns are dropped once the
/// history holds `CONVERSATION_HISTORY_LIMIT` entries.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    history: VecDeque<ConversationTurn>,
}

impl ConversationState {
    pub fn history(&self) -> &VecDeque<ConversationTurn> {
        &self.history
    }

    pub fn record_turn(&mut self, turn: ConversationTurn) {
        self.history.push_back(turn);
        while self.history.len() > CONVERSATION_HISTORY_LIMIT {
            self.history.pop_front();
        }
    }
}

#[derive(Clone)]
pub struct ConversationRouter {
    answers: AnswerResolver,
}

impl ConversationRouter {
    pub fn new(answers: AnswerResolver) -> Self {
        Self { answers }
    }

    pub fn answers(&self) -> &AnswerResolver {
        &self.answers
    }

    pub async fn process_message(&self, state: &mut ConversationState, input: &str) -> String {
        let input = input.trim();
        if input.is_empty() {
            return EMPTY_INPUT_REPLY.to_string();
        }

        let now = Local::now();
        let canned = canned_reply(input, now, &mut rand::thread_rng());
        if let Some(reply) = canned {
            return reply;
        }
        if input.split_whitespace().count() <= SHORT_INPUT_MAX_WORDS {
            return SHORT_INPUT_REPLY.to_string();
        }

        let query = extract_query(input);
        if query.is_empty() {
            return UNCLEAR_QUERY_REPLY.to_string();
        }
        debug!(query, "routing message to answer pipeline");

        let result = self.answers.get_answer(&query).await;
        let response = format_response(result.as_ref(), &query);

        state.record_turn(ConversationTurn::new(input, &response, Local::now()));
        response
    }
}
