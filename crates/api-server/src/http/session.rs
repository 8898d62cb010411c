use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;
use uuid::Uuid;

pub(super) const SESSION_COOKIE: &str = "chat_session";

#[derive(Clone, Debug)]
pub(super) struct ChatSession {
    pub(super) id: String,
}

/// Resolves the caller's session from the `chat_session` cookie, minting a
/// fresh id when it is missing or malformed, and echoes it back as a cookie.
pub(super) async fn session_middleware(mut req: Request, next: Next) -> Response {
    let session_id = match session_from_headers(req.headers()) {
        Some(session_id) => session_id,
        None => {
            let session_id = Uuid::new_v4().to_string();
            debug!(session_id = %session_id, "minted chat session");
            session_id
        }
    };

    req.extensions_mut().insert(ChatSession {
        id: session_id.clone(),
    });

    let mut response = next.run(req).await;
    if let Ok(cookie) = HeaderValue::from_str(&session_cookie(&session_id)) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    response
}

fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|session_id| session_id.to_string())
}

fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}
