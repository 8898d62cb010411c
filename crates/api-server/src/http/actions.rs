use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Local};
use shared::chat::{LookupOrigin, format_response};
use shared::models::{QuickActionRequest, SearchRequest, StatsResponse, TextResponse};
use tracing::info;

use super::AppState;
use super::errors::{bad_request_response, store_error_response};
use super::session::ChatSession;

const JOKE_ACTION_REPLY: &str = "😂 **Joke of the day:** Why don't scientists trust atoms? Because they make up everything! 🤓";
const WEATHER_ACTION_REPLY: &str =
    "🌤️ I'm not connected to live weather, but I hope it's beautiful where you are! 😊";
const UNKNOWN_ACTION_REPLY: &str =
    "I'm not sure what you want me to do. Try asking differently! 😊";
const HELP_ACTION_BODY: &str = r#"
🤖 **I'm Wikipedia ChatBot - Your Personal Research Assistant!**

📚 **What I can do:**
• Answer questions about **ANY topic** using Wikipedia
• Provide information on **science, history, geography, people, events**
• Explain **concepts and terminology**
• Share **facts and detailed explanations**

💡 **How to use me:**
Just ask questions like:
• "What is artificial intelligence?"
• "Who was Albert Einstein?"
• "Tell me about the Roman Empire"
• "Explain how photosynthesis works"
• "What are black holes?"
"#;
const UNKNOWN_SINCE: &str = "Unknown";

pub(super) fn quick_action_reply(
    action: &str,
    username: Option<&str>,
    now: DateTime<Local>,
) -> String {
    match action {
        "time" => format!("⏰ The current time is: **{}**", now.format("%I:%M %p")),
        "date" => format!("📅 Today is: **{}**", now.format("%A, %B %d, %Y")),
        "joke" => JOKE_ACTION_REPLY.to_string(),
        "weather" => WEATHER_ACTION_REPLY.to_string(),
        "help" => {
            let sign_off = match username {
                Some(name) => format!("Nice chatting with you, {name}! 😊"),
                None => "Ask me anything! 😊".to_string(),
            };
            format!("{HELP_ACTION_BODY}\n{sign_off}\n")
        }
        _ => UNKNOWN_ACTION_REPLY.to_string(),
    }
}

pub(super) async fn quick_action(
    State(state): State<AppState>,
    Extension(session): Extension<ChatSession>,
    Json(req): Json<QuickActionRequest>,
) -> Response {
    let username = match state.profiles.load_profile(&session.id).await {
        Ok(profile) => profile.and_then(|profile| profile.username),
        Err(err) => return store_error_response(err),
    };

    let response = quick_action_reply(req.action.trim(), username.as_deref(), Local::now());
    (StatusCode::OK, Json(TextResponse { response })).into_response()
}

pub(super) async fn search_topic(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Response {
    let topic = req.topic.trim();
    if topic.is_empty() {
        return bad_request_response("invalid_topic", "topic is required");
    }

    info!(topic, "direct knowledge-base search");
    let result = state
        .router
        .answers()
        .answer_from(LookupOrigin::KnowledgeBase, topic)
        .await;
    let response = format_response(result.as_ref(), topic);

    (StatusCode::OK, Json(TextResponse { response })).into_response()
}

pub(super) async fn get_stats(
    State(state): State<AppState>,
    Extension(session): Extension<ChatSession>,
) -> Response {
    let profile = match state.profiles.load_profile(&session.id).await {
        Ok(profile) => profile.unwrap_or_default(),
        Err(err) => return store_error_response(err),
    };

    let stats = StatsResponse {
        total_conversations: state.conversations.turn_count(&session.id).await,
        user_messages: profile.chat_history.len(),
        username: profile.username,
        since: profile
            .created_at
            .unwrap_or_else(|| UNKNOWN_SINCE.to_string()),
    };

    (StatusCode::OK, Json(stats)).into_response()
}
