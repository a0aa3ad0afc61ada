//! Session identity, lifecycle states, and the end-of-session summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// States of the interview session lifecycle.
///
/// `Idle` is initial; `Done` is terminal. The legal moves between them are
/// owned by [`crate::state_machine::StateMachine`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    ProblemPresented,
    Evaluating,
    AwaitingAction,
    Done,
}

impl SessionState {
    /// Stable snake_case name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::ProblemPresented => "problem_presented",
            SessionState::Evaluating => "evaluating",
            SessionState::AwaitingAction => "awaiting_action",
            SessionState::Done => "done",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One end-to-end interview attempt.
///
/// Sessions are never deleted; a session that reaches `Done` is sealed and
/// survives only as its event log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Unique opaque identifier (UUID v4).
    pub session_id: String,

    /// The problem this session presents. Fixed to one problem per
    /// installation.
    pub problem_id: String,

    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session with a generated identifier.
    pub fn new(problem_id: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            problem_id: problem_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Final outcome category of a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Last evaluation passed every test.
    Success,

    /// Last evaluation passed at least half the tests.
    PartialSuccess,

    /// The candidate signalled give-up.
    GaveUp,

    /// Ended without a passing or partially passing final attempt.
    Incomplete,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionOutcome::Success => "success",
            SessionOutcome::PartialSuccess => "partial_success",
            SessionOutcome::GaveUp => "gave_up",
            SessionOutcome::Incomplete => "incomplete",
        }
    }
}

/// Statistics computed once at `end`, derived purely from the event log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub session_id: String,
    pub outcome: SessionOutcome,
    pub total_attempts: u32,
    pub final_tests_passed: u32,
    pub final_tests_failed: u32,
    /// Number of hints issued.
    pub hints_used: u32,
    /// Levels of the hints issued, in order.
    pub hint_levels: Vec<u8>,
    pub duration_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_serde_names() {
        let json = serde_json::to_string(&SessionState::AwaitingAction).expect("serialize");
        assert_eq!(json, "\"awaiting_action\"");
        let back: SessionState = serde_json::from_str("\"problem_presented\"").expect("deserialize");
        assert_eq!(back, SessionState::ProblemPresented);
    }

    #[test]
    fn test_session_new_generates_unique_ids() {
        let a = Session::new("lru_cache");
        let b = Session::new("lru_cache");
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(a.problem_id, "lru_cache");
    }

    #[test]
    fn test_summary_serde_roundtrip() {
        let summary = SessionSummary {
            session_id: "abc".to_string(),
            outcome: SessionOutcome::PartialSuccess,
            total_attempts: 3,
            final_tests_passed: 8,
            final_tests_failed: 4,
            hints_used: 2,
            hint_levels: vec![1, 2],
            duration_seconds: 900,
        };
        let json = serde_json::to_string(&summary).expect("serialize");
        let back: SessionSummary = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(summary, back);
    }

    #[test]
    fn test_outcome_as_str_matches_serde() {
        for outcome in [
            SessionOutcome::Success,
            SessionOutcome::PartialSuccess,
            SessionOutcome::GaveUp,
            SessionOutcome::Incomplete,
        ] {
            let json = serde_json::to_string(&outcome).expect("serialize");
            assert_eq!(json, format!("\"{}\"", outcome.as_str()));
        }
    }
}
