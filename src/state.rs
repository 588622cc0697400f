use crate::errors::AppError;
use crate::session::SessionState;
use crate::source::CovidApi;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::info;
use uuid::Uuid;

/// A session is locked for the whole of each operation, so at most one
/// fetch per session is ever in flight.
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Longest pause between two idle sweeps.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

struct SessionEntry {
    session: SharedSession,
    last_access: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub source: CovidApi,
    pub default_country: String,
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
}

impl AppState {
    pub fn new(source: CovidApi, default_country: impl Into<String>) -> Self {
        Self {
            source,
            default_country: default_country.into(),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn register(&self, session: SessionState) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.lock().await.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(session)),
                last_access: Instant::now(),
            },
        );
        id
    }

    /// Looks up a session and marks it as used.
    pub async fn session(&self, id: Uuid) -> Result<SharedSession, AppError> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("unknown session {id}")))?;
        entry.last_access = Instant::now();
        Ok(Arc::clone(&entry.session))
    }

    pub async fn end(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Drops every session not looked up within `ttl`, returning how many
    /// were dropped.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_access.elapsed() <= ttl);
        before - sessions.len()
    }

    /// Sweeps idle sessions in the background for as long as the handle
    /// lives.
    pub fn spawn_idle_sweeper(&self, ttl: Duration) -> JoinHandle<()> {
        let state = self.clone();
        let period = (ttl / 2).clamp(Duration::from_millis(10), MAX_SWEEP_PERIOD);

        tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = state.evict_idle(ttl).await;
                if evicted > 0 {
                    let active = state.session_count().await;
                    info!(evicted, active, "dropped idle sessions");
                }
            }
        })
    }
}
