//! Per-session admission control: a ceiling on calls in flight (call depth)
//! and an optional cumulative token ceiling.

use council_application::ports::budget_guard::{Admission, BudgetGuard, CallKind, CallMetadata};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Accounting for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionUsage {
    pub in_flight: usize,
    pub calls: usize,
    pub tokens: u64,
}

pub struct SessionBudgetGuard {
    max_concurrent_calls: usize,
    max_session_tokens: Option<u64>,
    usage: Mutex<HashMap<String, SessionUsage>>,
}

impl SessionBudgetGuard {
    pub fn new(max_concurrent_calls: usize, max_session_tokens: Option<u64>) -> Self {
        Self {
            max_concurrent_calls: max_concurrent_calls.max(1),
            max_session_tokens,
            usage: Mutex::new(HashMap::new()),
        }
    }

    pub fn usage(&self, session_id: &str) -> SessionUsage {
        self.usage
            .lock()
            .map(|usage| usage.get(session_id).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    fn update(&self, session_id: &str, f: impl FnOnce(&mut SessionUsage)) {
        if let Ok(mut usage) = self.usage.lock() {
            f(usage.entry(session_id.to_string()).or_default());
        }
    }
}

impl BudgetGuard for SessionBudgetGuard {
    fn check_allowed(
        &self,
        session_id: &str,
        kind: CallKind,
        metadata: &CallMetadata,
        estimated_tokens: u64,
    ) -> Admission {
        let usage = self.usage(session_id);

        if usage.in_flight >= self.max_concurrent_calls {
            warn!(
                session_id,
                participant = %metadata.participant_name,
                in_flight = usage.in_flight,
                "Call depth limit reached"
            );
            return Admission::deny(format!(
                "call depth limit reached ({} of {} calls already in flight)",
                usage.in_flight, self.max_concurrent_calls
            ));
        }

        if let Some(ceiling) = self.max_session_tokens
            && usage.tokens.saturating_add(estimated_tokens) > ceiling
        {
            warn!(
                session_id,
                participant = %metadata.participant_name,
                used = usage.tokens,
                ceiling,
                "Token budget exhausted"
            );
            return Admission::deny(format!(
                "session token budget exhausted ({} of {} tokens used, this call needs about {})",
                usage.tokens, ceiling, estimated_tokens
            ));
        }

        debug!(
            session_id,
            participant = %metadata.participant_name,
            role = %metadata.role_label,
            kind = kind.as_str(),
            estimated_tokens,
            "Call admitted"
        );
        Admission::allow()
    }

    fn record_call(&self, session_id: &str) {
        self.update(session_id, |u| {
            u.in_flight += 1;
            u.calls += 1;
        });
    }

    fn complete_call(&self, session_id: &str) {
        self.update(session_id, |u| u.in_flight = u.in_flight.saturating_sub(1));
    }

    fn update_token_count(&self, session_id: &str, tokens: u64) {
        self.update(session_id, |u| u.tokens += tokens);
    }
}
