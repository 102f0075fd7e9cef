//! Process-wide session registry and the session change broadcast

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::models::session::SessionEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy)]
struct OpenSession {
    user_id: Uuid,
    /// Unix timestamp the token stops being valid
    expires_at: i64,
}

impl OpenSession {
    fn is_live(&self, now: i64) -> bool {
        self.expires_at > now
    }
}

/// Tracks which issued sessions are still open and notifies subscribers of changes
#[derive(Clone)]
pub struct SessionRegistry {
    /// session id -> open session
    active: Arc<RwLock<HashMap<Uuid, OpenSession>>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            active: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    /// Register a session until `expires_at`; expired entries are dropped on the way
    pub async fn open(&self, session_id: Uuid, user_id: Uuid, expires_at: i64) {
        let now = Utc::now().timestamp();
        let mut active = self.active.write().await;
        let before = active.len();
        active.retain(|_, session| session.is_live(now));
        let pruned = before - active.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped expired sessions");
        }
        active.insert(session_id, OpenSession { user_id, expires_at });
    }

    /// Close a session; returns the user it belonged to if it was open
    pub async fn close(&self, session_id: Uuid) -> Option<Uuid> {
        let now = Utc::now().timestamp();
        self.active
            .write()
            .await
            .remove(&session_id)
            .filter(|session| session.is_live(now))
            .map(|session| session.user_id)
    }

    pub async fn is_active(&self, session_id: Uuid) -> bool {
        let now = Utc::now().timestamp();
        self.active
            .read()
            .await
            .get(&session_id)
            .is_some_and(|session| session.is_live(now))
    }

    /// Number of open sessions of a user
    pub async fn count_for_user(&self, user_id: Uuid) -> usize {
        let now = Utc::now().timestamp();
        self.active
            .read()
            .await
            .values()
            .filter(|session| session.user_id == user_id && session.is_live(now))
            .count()
    }

    pub fn publish(&self, event: SessionEvent) {
        tracing::debug!(event = event.kind(), user_id = %event.user_id(), "Session event");
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
