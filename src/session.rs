use crate::{client::ImageApi, studio::Studio};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

struct SessionEntry {
    studio: Arc<Studio>,
    last_seen: DateTime<Utc>,
}

/// In-memory studios keyed by browser session id.
///
/// Nothing is persisted. When the store is full the least recently seen
/// session is evicted.
pub struct SessionStore {
    api: Arc<dyn ImageApi>,
    max_sessions: usize,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn ImageApi>, max_sessions: usize) -> Self {
        Self {
            api,
            max_sessions: max_sessions.max(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the studio for `id`, creating a fresh session when the id is
    /// missing or unknown. The returned id is the one the caller must keep.
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, Arc<Studio>) {
        let mut sessions = self.sessions.lock().await;
        let now = Utc::now();

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, entry.studio.clone());
            }
        }

        if sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                log::debug!("Evicting idle session {}", oldest);
                sessions.remove(&oldest);
            }
        }

        let id = Uuid::new_v4();
        let studio = Arc::new(Studio::new(self.api.clone()));
        sessions.insert(
            id,
            SessionEntry {
                studio: studio.clone(),
                last_seen: now,
            },
        );
        log::info!("🆕 New session {} ({} active)", id, sessions.len());
        (id, studio)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
