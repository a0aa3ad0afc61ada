//! Session events: the append-only record of everything that happened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of event tags. The wire form is SCREAMING_SNAKE_CASE, one
/// JSON object per log line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    SessionStarted,
    CodeSubmitted,
    EvalResult,
    HintRequested,
    HintGiven,
    AgentResponse,
    SessionEnded,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::SessionStarted => "SESSION_STARTED",
            EventType::CodeSubmitted => "CODE_SUBMITTED",
            EventType::EvalResult => "EVAL_RESULT",
            EventType::HintRequested => "HINT_REQUESTED",
            EventType::HintGiven => "HINT_GIVEN",
            EventType::AgentResponse => "AGENT_RESPONSE",
            EventType::SessionEnded => "SESSION_ENDED",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable, timestamped fact about a session.
///
/// Events are totally ordered by append position within their session log
/// and are never mutated or removed once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Which session this event belongs to.
    pub session_id: String,

    /// When the event occurred (UTC).
    pub timestamp: DateTime<Utc>,

    /// Event classification.
    pub event_type: EventType,

    /// Event-specific payload.
    pub payload: serde_json::Value,
}

impl Event {
    /// Create a new event stamped with the current time.
    pub fn new(
        session_id: impl Into<String>,
        event_type: EventType,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event_type,
            payload,
        }
    }
}
