//! Error taxonomy for the session engine.
//!
//! Three tiers, with different propagation rules:
//! - [`SessionError`] — caller mistakes. Always recoverable, reported
//!   synchronously, and guaranteed to leave state and log untouched.
//! - Evaluation faults (timeout, import failure, bad signature, runtime
//!   fault) are *data*, not errors: the sandbox turns them into an
//!   [`crate::sandbox::ExecOutcome`] and the classifier into an
//!   `EVAL_RESULT` event. They never appear in this module.
//! - [`OnsiteError`] — everything else (storage, sandbox infrastructure,
//!   serialization, replay corruption). Fatal to the current command,
//!   surfaced to the caller, never silently swallowed.

use crate::domain::session::SessionState;
use crate::state_machine::Command;

/// Caller mistakes. Rejecting one changes no state and appends no event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no active session")]
    NoActiveSession,

    #[error("session {0} is already active; end it first")]
    SessionAlreadyActive(String),

    #[error("cannot {action} while session is {state}")]
    InvalidTransition { state: SessionState, action: Command },
}

/// Engine-level errors.
#[derive(Debug, thiserror::Error)]
pub enum OnsiteError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("storage error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("sandbox error: {0}")]
    Sandbox(#[from] crate::sandbox::SandboxError),

    #[error("event log corrupt on replay: {0}")]
    Replay(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl OnsiteError {
    /// True when the error is a recoverable caller mistake rather than a
    /// system fault.
    pub fn is_session_error(&self) -> bool {
        matches!(self, OnsiteError::Session(_))
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, OnsiteError>;
