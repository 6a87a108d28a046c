//! Cooperative stop/pause signal for a running session.
//!
//! Neither flag preempts a call already dispatched to a model; both are
//! consulted at [`ControlSignal::checkpoint`], which every turn and every
//! batch chunk passes before starting. A paused checkpoint genuinely
//! suspends until resume or stop.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// The pipeline was asked to stop
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Session stopped by request")]
pub struct Stopped;

#[derive(Debug)]
pub struct ControlSignal {
    stop: CancellationToken,
    pause: watch::Sender<bool>,
    /// Serialises pause toggling with phase status changes
    gate: Mutex<()>,
}

impl Default for ControlSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlSignal {
    pub fn new() -> Self {
        let (pause, _) = watch::channel(false);
        Self {
            stop: CancellationToken::new(),
            pause,
            gate: Mutex::new(()),
        }
    }

    pub fn stop(&self) {
        self.stop.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    pub fn is_paused(&self) -> bool {
        *self.pause.borrow()
    }

    pub fn set_paused(&self, paused: bool) {
        self.pause.send_replace(paused);
    }

    /// Flip the pause flag, returning the new state
    pub fn toggle_pause(&self) -> bool {
        let mut paused = false;
        self.pause.send_modify(|p| {
            *p = !*p;
            paused = *p;
        });
        paused
    }

    pub(crate) fn gate(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait until the session may proceed.
    ///
    /// Returns immediately when running, suspends while paused, and fails
    /// with [`Stopped`] as soon as a stop is requested.
    pub async fn checkpoint(&self) -> Result<(), Stopped> {
        let mut paused = self.pause.subscribe();
        loop {
            if self.stop.is_cancelled() {
                return Err(Stopped);
            }
            if !*paused.borrow_and_update() {
                return Ok(());
            }
            tokio::select! {
                _ = self.stop.cancelled() => return Err(Stopped),
                changed = paused.changed() => {
                    if changed.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Control signals of the sessions currently running
#[derive(Debug, Default)]
pub struct ControlRegistry {
    signals: Mutex<HashMap<String, Arc<ControlSignal>>>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<ControlSignal>>> {
        self.signals.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a fresh signal; `None` if the session is already running
    pub fn register(&self, session_id: &str) -> Option<Registration<'_>> {
        let mut signals = self.lock();
        if signals.contains_key(session_id) {
            return None;
        }
        let signal = Arc::new(ControlSignal::new());
        signals.insert(session_id.to_string(), Arc::clone(&signal));
        Some(Registration {
            registry: self,
            session_id: session_id.to_string(),
            signal,
        })
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<ControlSignal>> {
        self.lock().get(session_id).cloned()
    }

    pub fn is_running(&self, session_id: &str) -> bool {
        self.lock().contains_key(session_id)
    }
}

/// Keeps a session registered; the signal is discarded when dropped
pub struct Registration<'a> {
    registry: &'a ControlRegistry,
    session_id: String,
    signal: Arc<ControlSignal>,
}

impl Registration<'_> {
    pub fn signal(&self) -> &ControlSignal {
        &self.signal
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.session_id);
    }
}
