use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Local;
use shared::chat::{extract_name, is_name_message};
use shared::models::{
    ChatEntry, ChatRequest, ChatResponse, HistoryResponse, OkResponse, SessionResponse,
    UpdateUsernameRequest, UpdateUsernameResponse,
};
use tracing::info;

use super::AppState;
use super::errors::{bad_request_response, store_error_response};
use super::session::ChatSession;

pub(super) fn welcome_message(name: &str) -> String {
    format!("Nice to meet you, {name}! 😊 I'm your Wikipedia-powered chatbot. Ask me anything!")
}

pub(super) async fn get_session(
    State(state): State<AppState>,
    Extension(session): Extension<ChatSession>,
) -> Response {
    match state.profiles.load_or_create_profile(&session.id).await {
        Ok(profile) => (
            StatusCode::OK,
            Json(SessionResponse {
                username: profile.username,
            }),
        )
            .into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn chat(
    State(state): State<AppState>,
    Extension(session): Extension<ChatSession>,
    Json(req): Json<ChatRequest>,
) -> Response {
    let message = req.message.trim();
    if message.is_empty() {
        return bad_request_response("empty_message", "message is required");
    }

    if let Some(response) = introduce(&state, &session, message).await {
        return response;
    }

    let conversation = state.conversations.session(&session.id).await;
    let response = {
        let mut conversation = conversation.lock().await;
        state.router.process_message(&mut conversation, message).await
    };

    let history_limit = state.history_limit;
    let entry = ChatEntry::new(message, &response, Local::now());
    let username = match state
        .profiles
        .update_profile(&session.id, |profile| {
            profile.push_entry(entry, history_limit);
            profile.username.clone()
        })
        .await
    {
        Ok(username) => username,
        Err(err) => return store_error_response(err),
    };

    (StatusCode::OK, Json(ChatResponse { response, username })).into_response()
}

// Handles "my name is ..." style messages for sessions without a username.
// Returns `None` when the message should go through the normal pipeline.
async fn introduce(state: &AppState, session: &ChatSession, message: &str) -> Option<Response> {
    if !is_name_message(message) {
        return None;
    }
    let name = extract_name(message)?;
    let response = welcome_message(&name);

    let history_limit = state.history_limit;
    let entry = ChatEntry::new(message, &response, Local::now());
    let introduced = state
        .profiles
        .update_profile(&session.id, |profile| {
            if profile.username.is_some() {
                return false;
            }
            profile.username = Some(name.clone());
            profile.push_entry(entry, history_limit);
            true
        })
        .await;

    match introduced {
        Ok(true) => {
            info!(session_id = %session.id, "username set from introduction");
            Some(
                (
                    StatusCode::OK,
                    Json(ChatResponse {
                        response,
                        username: Some(name),
                    }),
                )
                    .into_response(),
            )
        }
        Ok(false) => None,
        Err(err) => Some(store_error_response(err)),
    }
}

pub(super) async fn get_history(
    State(state): State<AppState>,
    Extension(session): Extension<ChatSession>,
) -> Response {
    match state.profiles.load_profile(&session.id).await {
        Ok(profile) => (
            StatusCode::OK,
            Json(HistoryResponse {
                history: profile
                    .map(|profile| profile.chat_history)
                    .unwrap_or_default(),
            }),
        )
            .into_response(),
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn clear_history(
    State(state): State<AppState>,
    Extension(session): Extension<ChatSession>,
) -> Response {
    match state
        .profiles
        .update_profile(&session.id, |profile| profile.chat_history.clear())
        .await
    {
        Ok(()) => {
            info!(session_id = %session.id, "chat history cleared");
            (StatusCode::OK, Json(OkResponse { ok: true })).into_response()
        }
        Err(err) => store_error_response(err),
    }
}

pub(super) async fn update_username(
    State(state): State<AppState>,
    Extension(session): Extension<ChatSession>,
    Json(req): Json<UpdateUsernameRequest>,
) -> Response {
    let username = req.username.trim();
    if username.is_empty() {
        return bad_request_response("invalid_username", "username is required");
    }

    let response = welcome_message(username);
    let history_limit = state.history_limit;
    let entry = ChatEntry::new(&format!("My name is {username}"), &response, Local::now());
    if let Err(err) = state
        .profiles
        .update_profile(&session.id, |profile| {
            profile.username = Some(username.to_string());
            profile.push_entry(entry, history_limit);
        })
        .await
    {
        return store_error_response(err);
    }

    info!(session_id = %session.id, "username updated");
    (
        StatusCode::OK,
        Json(UpdateUsernameResponse {
            username: username.to_string(),
            response,
        }),
    )
        .into_response()
}
