use crate::session::SearchSession;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<SearchSession>>;

/// In-memory session registry
///
/// Sessions are never persisted and expire after sitting idle. Each session is
/// mutated under its own lock, so one client's actions are applied one at a time.
#[derive(Clone)]
pub struct SessionStore {
    sessions: moka::future::Cache<Uuid, SharedSession>,
}

impl SessionStore {
    pub fn new(max_sessions: u64, idle_timeout_secs: u64) -> Self {
        let sessions = moka::future::CacheBuilder::new(max_sessions)
            .time_to_idle(Duration::from_secs(idle_timeout_secs))
            .build();

        Self { sessions }
    }

    pub async fn insert(&self, session: SearchSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Arc::new(Mutex::new(session))).await;
        tracing::debug!("Opened session {}", id);
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).await
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).await.is_some()
    }

    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
