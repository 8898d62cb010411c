use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::chat::ConversationRouter;
use shared::profiles::ProfileStore;

mod actions;
mod chat;
mod conversations;
mod errors;
mod health;
mod observability;
mod session;

pub use conversations::ConversationRegistry;

#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileStore,
    pub router: ConversationRouter,
    pub conversations: ConversationRegistry,
    pub history_limit: usize,
}

impl AppState {
    pub fn new(profiles: ProfileStore, router: ConversationRouter, history_limit: usize) -> Self {
        Self {
            profiles,
            router,
            conversations: ConversationRegistry::default(),
            history_limit,
        }
    }
}

pub fn build_router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .with_state(app_state.clone());

    let session_routes = Router::new()
        .route("/v1/session", get(chat::get_session))
        .route("/v1/chat", post(chat::chat))
        .route("/v1/history", get(chat::get_history))
        .route("/v1/history/clear", post(chat::clear_history))
        .route("/v1/username", post(chat::update_username))
        .route("/v1/quick-actions", post(actions::quick_action))
        .route("/v1/search", post(actions::search_topic))
        .route("/v1/stats", get(actions::get_stats))
        .layer(middleware::from_fn(session::session_middleware))
        .with_state(app_state);

    public_routes
        .merge(session_routes)
        .layer(middleware::from_fn(
            observability::request_observability_middleware,
        ))
}
