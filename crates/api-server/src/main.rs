use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_server::http::{self, ConversationRegistry};
use shared::chat::{AnswerResolver, ConversationRouter};
use shared::config::ApiConfig;
use shared::lookup::HttpLookupClient;
use shared::profiles::ProfileStore;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api_server=debug,shared=debug,axum=info".to_string()),
        )
        .init();

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let lookup_client = match HttpLookupClient::new(config.lookup.clone()) {
        Ok(client) => client,
        Err(err) => {
            error!("failed to build lookup client: {err}");
            std::process::exit(1);
        }
    };

    let profiles = ProfileStore::open(config.profile_store_path.clone());
    if let Err(err) = profiles.ping().await {
        error!(
            path = %profiles.path().display(),
            "profile store directory is unusable: {err}"
        );
        std::process::exit(1);
    }

    let answers = AnswerResolver::new(Arc::new(lookup_client), config.relevance.clone());
    let mut state = http::AppState::new(
        profiles,
        ConversationRouter::new(answers),
        config.history_limit,
    );
    state.conversations =
        ConversationRegistry::with_idle_ttl(Duration::from_secs(config.session_idle_ttl_seconds));
    state
        .conversations
        .spawn_pruner(Duration::from_secs(config.session_prune_interval_seconds));
    let app = http::build_router(state);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .unwrap_or_else(|_| "127.0.0.1:5000".parse().expect("valid default bind addr"));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind should succeed");

    info!(
        wikipedia = %config.lookup.wikipedia_base_url,
        profile_store = %config.profile_store_path.display(),
        "chat server listening on {}",
        listener.local_addr().unwrap_or(addr)
    );
    axum::serve(listener, app).await.expect("server should run");
}
