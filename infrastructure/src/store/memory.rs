//! In-memory [`SessionStore`] with debounced persistence.
//!
//! Every mutation marks the session dirty. The first mutation after a save
//! schedules one save after the debounce interval; later mutations inside
//! the interval ride along with it. Without a tokio runtime the save happens
//! inline.

use super::persistence::{NoPersistence, SessionPersistence};
use council_application::ports::session_store::{SessionStore, StoreError};
use council_domain::{
    DomainError, GeneratedFile, Message, MessagePatch, PredictionData, Session, SessionStatus,
    StatusChange, VoteData,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

struct Inner {
    sessions: Mutex<HashMap<String, Session>>,
    pending: Mutex<HashSet<String>>,
    persistence: Box<dyn SessionPersistence>,
    debounce: Duration,
}

impl Inner {
    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn pending(&self) -> MutexGuard<'_, HashSet<String>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Save the session now if it still has an unsaved change
    fn save_if_pending(&self, session_id: &str) {
        if !self.pending().remove(session_id) {
            return;
        }
        let Some(snapshot) = self.sessions().get(session_id).cloned() else {
            return;
        };
        match self.persistence.save(&snapshot) {
            Ok(()) => debug!(session_id, "Session saved"),
            Err(e) => warn!(session_id, error = %e, "Failed to save session"),
        }
    }
}

#[derive(Clone)]
pub struct MemorySessionStore {
    inner: Arc<Inner>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(Box::new(NoPersistence), Duration::from_millis(500))
    }
}

impl MemorySessionStore {
    pub fn new(persistence: Box<dyn SessionPersistence>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: Mutex::new(HashMap::new()),
                pending: Mutex::new(HashSet::new()),
                persistence,
                debounce,
            }),
        }
    }

    /// Save every dirty session immediately
    pub fn flush(&self) {
        let dirty: Vec<String> = self.inner.pending().iter().cloned().collect();
        for session_id in dirty {
            self.inner.save_if_pending(&session_id);
        }
    }

    fn schedule_save(&self, session_id: &str) {
        if !self.inner.pending().insert(session_id.to_string()) {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let inner = Arc::clone(&self.inner);
                let session_id = session_id.to_string();
                handle.spawn(async move {
                    tokio::time::sleep(inner.debounce).await;
                    inner.save_if_pending(&session_id);
                });
            }
            Err(_) => self.inner.save_if_pending(session_id),
        }
    }

    fn mutate<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut Session) -> Result<T, DomainError>,
    ) -> Result<T, StoreError> {
        let result = {
            let mut sessions = self.inner.sessions();
            let session = sessions
                .get_mut(session_id)
                .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
            f(session)?
        };
        self.schedule_save(session_id);
        Ok(result)
    }
}

impl SessionStore for MemorySessionStore {
    fn create_session(&self, session: Session) -> Result<(), StoreError> {
        let session_id = session.id.clone();
        {
            let mut sessions = self.inner.sessions();
            if sessions.contains_key(&session_id) {
                return Err(StoreError::AlreadyExists(session_id));
            }
            sessions.insert(session_id.clone(), session);
        }
        debug!(session_id = %session_id, "Session created");
        self.schedule_save(&session_id);
        Ok(())
    }

    fn get_session(&self, session_id: &str) -> Option<Session> {
        self.inner.sessions().get(session_id).cloned()
    }

    fn add_message(&self, session_id: &str, message: Message) -> Result<String, StoreError> {
        self.mutate(session_id, |s| s.push_message(message))
    }

    fn update_message(
        &self,
        session_id: &str,
        message_id: &str,
        patch: MessagePatch,
    ) -> Result<(), StoreError> {
        self.mutate(session_id, |s| s.patch_message(message_id, patch))
    }

    fn update_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<StatusChange, StoreError> {
        let change = {
            let mut sessions = self.inner.sessions();
            let session = sessions
                .get_mut(session_id)
                .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
            let from = session.status();
            let change = session.apply_status(status)?;
            if change.is_changed() {
                info!(session_id, from = from.as_str(), to = status.as_str(), "Session status changed");
            }
            change
        };
        if change.is_changed() {
            self.schedule_save(session_id);
        }
        Ok(change)
    }

    fn set_vote_data(&self, session_id: &str, data: VoteData) -> Result<(), StoreError> {
        self.mutate(session_id, |s| s.record_vote_data(data))
    }

    fn set_prediction_data(
        &self,
        session_id: &str,
        data: PredictionData,
    ) -> Result<(), StoreError> {
        self.mutate(session_id, |s| s.record_prediction_data(data))
    }

    fn add_generated_files(
        &self,
        session_id: &str,
        files: Vec<GeneratedFile>,
    ) -> Result<(), StoreError> {
        self.mutate(session_id, |s| s.record_generated_files(files))
    }
}
