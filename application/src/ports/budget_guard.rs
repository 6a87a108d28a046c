//! Budget guard port
//!
//! Admission control for model calls. Every granted call is paired with
//! exactly one [`BudgetGuard::complete_call`]; the orchestrator enforces the
//! pairing with [`CallGuard`].

/// Whether a call runs alone or inside a concurrent batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Single,
    Batched,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Single => "single",
            CallKind::Batched => "batched",
        }
    }
}

/// Who is being called, for the guard's accounting and denial messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMetadata {
    pub participant_id: String,
    pub participant_name: String,
    pub role_label: String,
}

/// Admission decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl Admission {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

pub trait BudgetGuard: Send + Sync {
    fn check_allowed(
        &self,
        session_id: &str,
        kind: CallKind,
        metadata: &CallMetadata,
        estimated_tokens: u64,
    ) -> Admission;

    fn record_call(&self, session_id: &str);

    fn complete_call(&self, session_id: &str);

    fn update_token_count(&self, session_id: &str, tokens: u64);
}

/// Guard with no limits
pub struct UnlimitedBudget;

impl BudgetGuard for UnlimitedBudget {
    fn check_allowed(&self, _: &str, _: CallKind, _: &CallMetadata, _: u64) -> Admission {
        Admission::allow()
    }
    fn record_call(&self, _session_id: &str) {}
    fn complete_call(&self, _session_id: &str) {}
    fn update_token_count(&self, _session_id: &str, _tokens: u64) {}
}

/// Records a granted call and completes it when dropped
pub struct CallGuard<'a> {
    budget: &'a dyn BudgetGuard,
    session_id: &'a str,
}

impl<'a> CallGuard<'a> {
    pub fn record(budget: &'a dyn BudgetGuard, session_id: &'a str) -> Self {
        budget.record_call(session_id);
        Self { budget, session_id }
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        self.budget.complete_call(self.session_id);
    }
}
