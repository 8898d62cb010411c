use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const PROFILE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted exchange as stored in the profile file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatEntry {
    pub timestamp: String,
    pub user: String,
    pub bot: String,
    pub time: String,
}

impl ChatEntry {
    pub fn new(user: &str, bot: &str, at: DateTime<Local>) -> Self {
        Self {
            timestamp: at.format("%H:%M").to_string(),
            user: user.to_string(),
            bot: bot.to_string(),
            time: at.format(PROFILE_TIME_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub username: Option<String>,
    pub chat_history: Vec<ChatEntry>,
    pub created_at: Option<String>,
}

impl UserProfile {
    pub fn new(created_at: DateTime<Local>) -> Self {
        Self {
            username: None,
            chat_history: Vec::new(),
            created_at: Some(created_at.format(PROFILE_TIME_FORMAT).to_string()),
        }
    }

    /// Appends an entry and keeps only the newest `limit` entries.
    pub fn push_entry(&mut self, entry: ChatEntry, limit: usize) {
        self.chat_history.push(entry);
        if self.chat_history.len() > limit {
            let overflow = self.chat_history.len() - limit;
            self.chat_history.drain(..overflow);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<ChatEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUsernameRequest {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUsernameResponse {
    pub username: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickActionRequest {
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_conversations: usize,
    pub user_messages: usize,
    pub username: Option<String>,
    pub since: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
