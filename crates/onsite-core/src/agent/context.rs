//! Observation: deriving the agent's view of a session from its log.

use serde::{Deserialize, Serialize};

use crate::domain::{EvaluationResult, Event, EventType, FailureCategory, Result, SessionState};
use crate::replay;

/// A derived, non-persisted view of session history.
///
/// Recomputed on demand from the event log and never stored, so it cannot
/// diverge from the log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentContext {
    /// Completed evaluations so far.
    pub attempt_count: u32,

    /// Failure categories of every attempt, in order.
    pub failure_history: Vec<FailureCategory>,

    /// Most recent evaluation result, if any.
    pub last_eval: Option<EvaluationResult>,

    /// Hints already issued.
    pub hints_given: u32,

    /// Level of the most recent hint, if any.
    pub last_hint_level: Option<u8>,

    /// Failure categories observed since the last hint (all of them when
    /// no hint has been given yet).
    pub failures_since_last_hint: Vec<FailureCategory>,

    /// State the session is in at the end of the log.
    pub current_state: SessionState,
}

/// Derive the [`AgentContext`] from an ordered event sequence.
///
/// Fails only on log corruption: an `EVAL_RESULT` or `HINT_GIVEN` payload
/// that does not parse, or an event sequence that does not replay.
pub fn observe(events: &[Event]) -> Result<AgentContext> {
    let mut ctx = AgentContext {
        attempt_count: 0,
        failure_history: Vec::new(),
        last_eval: None,
        hints_given: 0,
        last_hint_level: None,
        failures_since_last_hint: Vec::new(),
        current_state: replay::replay_state(events)?,
    };

    for event in events {
        match event.event_type {
            EventType::EvalResult => {
                let result: EvaluationResult = serde_json::from_value(event.payload.clone())?;
                ctx.attempt_count += 1;
                ctx.failure_history.push(result.failure_category);
                ctx.failures_since_last_hint.push(result.failure_category);
                ctx.last_eval = Some(result);
            }
            EventType::HintGiven => {
                let level = event
                    .payload
                    .get("level")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as u8;
                ctx.hints_given += 1;
                ctx.last_hint_level = Some(level);
                ctx.failures_since_last_hint.clear();
            }
            _ => {}
        }
    }

    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailureCategory::*;

    fn started() -> Event {
        Event::new(
            "s1",
            EventType::SessionStarted,
            serde_json::json!({"problem_id": "lru_cache"}),
        )
    }

    fn submitted() -> Event {
        Event::new(
            "s1",
            EventType::CodeSubmitted,
            serde_json::json!({"path": "solution.py"}),
        )
    }

    fn eval(attempt: u32, category: FailureCategory) -> Event {
        let result = EvaluationResult {
            attempt_number: attempt,
            passed: category.is_pass(),
            failure_category: category,
            tests_passed: if category.is_pass() { 12 } else { 4 },
            tests_failed: if category.is_pass() { 0 } else { 8 },
            failing_tests: Vec::new(),
            exception: None,
            runtime_ms: 50,
        };
        Event::new(
            "s1",
            EventType::EvalResult,
            serde_json::to_value(&result).expect("payload"),
        )
    }

    fn hint(level: u8) -> Event {
        Event::new("s1", EventType::HintGiven, serde_json::json!({"level": level}))
    }

    fn hint_requested() -> Event {
        Event::new(
            "s1",
            EventType::HintRequested,
            serde_json::json!({"give_up": false}),
        )
    }

    #[test]
    fn test_observe_empty_log() {
        let ctx = observe(&[]).expect("observe");
        assert_eq!(ctx.attempt_count, 0);
        assert_eq!(ctx.hints_given, 0);
        assert_eq!(ctx.current_state, SessionState::Idle);
        assert!(ctx.last_eval.is_none());
    }

    #[test]
    fn test_observe_counts_attempts_and_failures() {
        let events = vec![
            started(),
            submitted(),
            eval(1, WrongAnswer),
            submitted(),
            eval(2, Exception),
        ];
        let ctx = observe(&events).expect("observe");

        assert_eq!(ctx.attempt_count, 2);
        assert_eq!(ctx.failure_history, vec![WrongAnswer, Exception]);
        assert_eq!(
            ctx.last_eval.expect("last eval").failure_category,
            Exception
        );
        assert_eq!(ctx.current_state, SessionState::AwaitingAction);
    }

    #[test]
    fn test_hint_resets_failures_since_last_hint() {
        let events = vec![
            started(),
            submitted(),
            eval(1, WrongAnswer),
            hint_requested(),
            hint(1),
            submitted(),
            eval(2, WrongAnswer),
        ];
        let ctx = observe(&events).expect("observe");

        assert_eq!(ctx.hints_given, 1);
        assert_eq!(ctx.last_hint_level, Some(1));
        assert_eq!(ctx.failures_since_last_hint, vec![WrongAnswer]);
        assert_eq!(ctx.failure_history, vec![WrongAnswer, WrongAnswer]);
    }

    #[test]
    fn test_observe_rejects_garbled_eval_payload() {
        let events = vec![
            started(),
            submitted(),
            Event::new("s1", EventType::EvalResult, serde_json::json!({"nope": 1})),
        ];
        assert!(observe(&events).is_err());
    }
}
