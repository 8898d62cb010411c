use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shared::chat::ConversationState;
use tokio::sync::Mutex;
use tracing::debug;

const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

struct SessionSlot {
    state: Arc<Mutex<ConversationState>>,
    last_seen: Instant,
}

type SessionMap = Arc<Mutex<HashMap<String, SessionSlot>>>;

/// In-memory conversation state keyed by session id.
///
/// The outer lock only guards the map; each session has its own lock so a
/// slow lookup in one session never blocks another. Sessions idle for longer
/// than the configured ttl are dropped by the pruner.
#[derive(Clone)]
pub struct ConversationRegistry {
    sessions: SessionMap,
    idle_ttl: Duration,
}

impl Default for ConversationRegistry {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_SESSION_IDLE_TTL)
    }
}

impl ConversationRegistry {
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    pub fn spawn_pruner(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let sessions = Arc::clone(&self.sessions);
        let idle_ttl = self.idle_ttl;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                prune_sessions(&sessions, idle_ttl, Instant::now()).await;
            }
        })
    }

    pub async fn session(&self, session_id: &str) -> Arc<Mutex<ConversationState>> {
        self.session_at(session_id, Instant::now()).await
    }

    async fn session_at(&self, session_id: &str, now: Instant) -> Arc<Mutex<ConversationState>> {
        let mut sessions = self.sessions.lock().await;
        let slot = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionSlot {
                state: Arc::default(),
                last_seen: now,
            });
        slot.last_seen = now;
        Arc::clone(&slot.state)
    }

    pub async fn turn_count(&self, session_id: &str) -> usize {
        let state = {
            let sessions = self.sessions.lock().await;
            sessions
                .get(session_id)
                .map(|slot| Arc::clone(&slot.state))
        };

        match state {
            Some(state) => state.lock().await.history().len(),
            None => 0,
        }
    }
}

// A session still referenced by an in-flight request is kept.
async fn prune_sessions(sessions: &SessionMap, idle_ttl: Duration, now: Instant) {
    let cutoff = now.checked_sub(idle_ttl).unwrap_or(now);
    let mut sessions = sessions.lock().await;
    let before = sessions.len();

    sessions.retain(|_, slot| slot.last_seen > cutoff || Arc::strong_count(&slot.state) > 1);

    let evicted = before - sessions.len();
    if evicted > 0 {
        debug!(evicted, remaining = sessions.len(), "pruned idle chat sessions");
    }
}
