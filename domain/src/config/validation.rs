//! Configuration issues reported before a session starts.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: no session can run with this configuration.
    Error,
    /// Non-fatal: sessions run but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No enabled participant has the speaker role.
    MissingSpeaker,
    /// More than one enabled speaker; the first one wins.
    MultipleSpeakers,
    /// Two participants share an id.
    DuplicateParticipant,
    /// A vote weight is zero, negative or not a number (treated as 1).
    InvalidVoteWeight,
    /// Concurrency of zero (treated as 1).
    ZeroConcurrency,
    /// Batch concurrency above the budget's concurrent-call ceiling.
    ConcurrencyAboveCallLimit,
    /// Unknown output format.
    UnknownOutputFormat,
    /// A `[[council.participants]]` entry names an unknown role.
    UnknownRole,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
