use super::state::{SessionState, SessionUpdate};
use crate::error::StoreError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Capacity of the per-session notification channel. Subscribers that lag
/// behind this many snapshots see a `Lagged` gap and must catch up via
/// `get`; there is no event log.
const NOTIFY_CAPACITY: usize = 64;

struct SessionEntry {
    state: SessionState,
    notify: broadcast::Sender<SessionState>,
}

/// Process-wide keyed session state with change notification.
///
/// The store is the single source of truth: components never mutate a
/// session directly, they submit a [`SessionUpdate`] which is merged under
/// the entry's lock and then published to every subscriber as a full
/// snapshot. Updates issued by one driver are observed in issue order;
/// nothing is guaranteed across unrelated sessions (nor needed).
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session and notify any early subscribers.
    pub async fn create(&self, state: SessionState) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&state.id) {
            return Err(StoreError::AlreadyExists(state.id.clone()));
        }

        debug!("session {} created ({:?})", state.id, state.status);

        let (notify, _) = broadcast::channel(NOTIFY_CAPACITY);
        // No receivers yet is the normal case here.
        let _ = notify.send(state.clone());
        sessions.insert(
            state.id.clone(),
            SessionEntry {
                state,
                notify,
            },
        );
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Option<SessionState> {
        let sessions = self.sessions.read().await;
        sessions.get(id).map(|entry| entry.state.clone())
    }

    /// Shallow-merge `update` into the session, then publish the full
    /// updated snapshot to all subscribers. Returns the merged state.
    pub async fn update(
        &self,
        id: &str,
        update: SessionUpdate,
    ) -> Result<SessionState, StoreError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        update.apply(&mut entry.state);
        let snapshot = entry.state.clone();
        // Send fails only when no subscriber is listening.
        let _ = entry.notify.send(snapshot.clone());
        Ok(snapshot)
    }

    /// Subscribe to every subsequent update of the session. Returns the
    /// current snapshot together with the receiver, so late subscribers
    /// learn the present state without racing the next update.
    pub async fn subscribe(
        &self,
        id: &str,
    ) -> Result<(SessionState, broadcast::Receiver<SessionState>), StoreError> {
        let sessions = self.sessions.read().await;
        let entry = sessions
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok((entry.state.clone(), entry.notify.subscribe()))
    }

    /// Remove the session and drop all subscribers (their receivers end).
    pub async fn delete(&self, id: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(id).is_some() {
            debug!("session {} deleted", id);
        }
    }
}
