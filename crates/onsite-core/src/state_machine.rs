//! The session state machine: a pure function from (state, command) to the
//! next state, with no knowledge of persistence.
//!
//! ```text
//! IDLE --start--> PROBLEM_PRESENTED --submit--> EVALUATING
//! EVALUATING --(evaluation completes)--> AWAITING_ACTION
//! AWAITING_ACTION --submit--> EVALUATING
//! AWAITING_ACTION --hint/status--> AWAITING_ACTION
//! PROBLEM_PRESENTED / EVALUATING / AWAITING_ACTION --end--> DONE
//! ```
//!
//! The `EVALUATING -> AWAITING_ACTION` step is not externally triggered;
//! it is the synchronous continuation after the sandbox returns, applied
//! via [`StateMachine::evaluation_complete`]. `end` is accepted from every
//! non-terminal, non-idle state so that an abandoned session can always be
//! sealed and the single-active-session invariant never deadlocks.

use serde::{Deserialize, Serialize};

use crate::domain::{SessionError, SessionState};

/// External commands entering the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Start,
    Submit,
    Hint,
    Status,
    End,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Submit => "submit",
            Command::Hint => "hint",
            Command::Status => "status",
            Command::End => "end",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next state for a legal (state, command) pair, `None` otherwise.
fn next_state(state: SessionState, command: Command) -> Option<SessionState> {
    use Command::*;
    use SessionState::*;

    match (state, command) {
        (Idle, Start) => Some(ProblemPresented),
        (ProblemPresented, Submit) => Some(Evaluating),
        (AwaitingAction, Submit) => Some(Evaluating),
        (AwaitingAction, Hint) => Some(AwaitingAction),
        (AwaitingAction, Status) => Some(AwaitingAction),
        (ProblemPresented, End) | (Evaluating, End) | (AwaitingAction, End) => Some(Done),
        _ => None,
    }
}

/// Tracks the current state and enforces legal transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachine {
    state: SessionState,
}

impl StateMachine {
    /// A fresh machine in the initial `Idle` state.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// A machine restored to a known state, e.g. after replay.
    pub fn with_state(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The state this command would lead to, without applying it.
    pub fn peek(&self, command: Command) -> Option<SessionState> {
        next_state(self.state, command)
    }

    /// Apply a command, or fail with `InvalidTransition` leaving the state
    /// unchanged.
    pub fn apply(&mut self, command: Command) -> Result<SessionState, SessionError> {
        match next_state(self.state, command) {
            Some(next) => {
                self.state = next;
                Ok(next)
            }
            None => Err(SessionError::InvalidTransition {
                state: self.state,
                action: command,
            }),
        }
    }

    /// The internal `Evaluating -> AwaitingAction` continuation, applied
    /// when the sandbox returns.
    pub fn evaluation_complete(&mut self) -> Result<SessionState, SessionError> {
        if self.state != SessionState::Evaluating {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                action: Command::Submit,
            });
        }
        self.state = SessionState::AwaitingAction;
        Ok(self.state)
    }

    /// True when a code submission is accepted here.
    pub fn accepts_submission(&self) -> bool {
        matches!(
            self.state,
            SessionState::ProblemPresented | SessionState::AwaitingAction
        )
    }

    /// True when a hint request is accepted here.
    pub fn accepts_hint(&self) -> bool {
        self.state == SessionState::AwaitingAction
    }

    /// True only in the terminal state.
    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
