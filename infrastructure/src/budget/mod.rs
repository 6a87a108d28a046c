//! Budget guard adapter.

mod session_guard;

pub use session_guard::{SessionBudgetGuard, SessionUsage};
