//! End-of-session summary, derived purely from the event log.

use chrono::{DateTime, Utc};

use crate::domain::{
    EvaluationResult, Event, EventType, FailureCategory, Result, SessionOutcome, SessionSummary,
};

/// Compute the summary for a session ending at `ended_at`.
///
/// Never an independent mutable object: every field is a fold over the
/// ordered event sequence.
pub fn summarize(
    session_id: &str,
    events: &[Event],
    ended_at: DateTime<Utc>,
) -> Result<SessionSummary> {
    let mut total_attempts = 0u32;
    let mut last_eval: Option<EvaluationResult> = None;
    let mut hint_levels: Vec<u8> = Vec::new();
    let mut gave_up = false;

    for event in events {
        match event.event_type {
            EventType::EvalResult => {
                let result: EvaluationResult = serde_json::from_value(event.payload.clone())?;
                total_attempts += 1;
                last_eval = Some(result);
            }
            EventType::HintGiven => {
                let level = event
                    .payload
                    .get("level")
                    .and_then(|v| v.as_u64())
                    .unwrap_or(0) as u8;
                hint_levels.push(level);
            }
            EventType::HintRequested => {
                if event
                    .payload
                    .get("give_up")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false)
                {
                    gave_up = true;
                }
            }
            _ => {}
        }
    }

    let outcome = match last_eval.as_ref().map(|r| r.failure_category) {
        Some(FailureCategory::Pass) => SessionOutcome::Success,
        Some(FailureCategory::PartialPass) => SessionOutcome::PartialSuccess,
        _ if gave_up => SessionOutcome::GaveUp,
        _ => SessionOutcome::Incomplete,
    };

    let started_at = events.first().map(|e| e.timestamp).unwrap_or(ended_at);
    let duration_seconds = ended_at
        .signed_duration_since(started_at)
        .num_seconds()
        .max(0) as u64;

    Ok(SessionSummary {
        session_id: session_id.to_string(),
        outcome,
        total_attempts,
        final_tests_passed: last_eval.as_ref().map(|r| r.tests_passed).unwrap_or(0),
        final_tests_failed: last_eval.as_ref().map(|r| r.tests_failed).unwrap_or(0),
        hints_used: hint_levels.len() as u32,
        hint_levels,
        duration_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-06T12:00:00Z")
            .expect("parse")
            .with_timezone(&Utc)
    }

    fn started_at(timestamp: DateTime<Utc>) -> Event {
        Event {
            session_id: "s1".to_string(),
            timestamp,
            event_type: EventType::SessionStarted,
            payload: serde_json::json!({"problem_id": "lru_cache"}),
        }
    }

    fn eval(category: FailureCategory, tests_passed: u32) -> Event {
        let result = EvaluationResult {
            attempt_number: 1,
            passed: category.is_pass(),
            failure_category: category,
            tests_passed,
            tests_failed: 12 - tests_passed,
            failing_tests: Vec::new(),
            exception: None,
            runtime_ms: 40,
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

    fn give_up_request() -> Event {
        Event::new(
            "s1",
            EventType::HintRequested,
            serde_json::json!({"give_up": true}),
        )
    }

    #[test]
    fn test_summary_success() {
        let start = fixed_time();
        let events = vec![
            started_at(start),
            eval(FailureCategory::WrongAnswer, 4),
            hint(1),
            eval(FailureCategory::Pass, 12),
        ];
        let summary =
            summarize("s1", &events, start + Duration::seconds(900)).expect("summarize");

        assert_eq!(summary.outcome, SessionOutcome::Success);
        assert_eq!(summary.total_attempts, 2);
        assert_eq!(summary.final_tests_passed, 12);
        assert_eq!(summary.final_tests_failed, 0);
        assert_eq!(summary.hints_used, 1);
        assert_eq!(summary.hint_levels, vec![1]);
        assert_eq!(summary.duration_seconds, 900);
    }

    #[test]
    fn test_summary_partial_success() {
        let events = vec![started_at(fixed_time()), eval(FailureCategory::PartialPass, 8)];
        let summary = summarize("s1", &events, fixed_time()).expect("summarize");
        assert_eq!(summary.outcome, SessionOutcome::PartialSuccess);
        assert_eq!(summary.final_tests_passed, 8);
    }

    #[test]
    fn test_summary_gave_up_beats_failing_result() {
        let events = vec![
            started_at(fixed_time()),
            eval(FailureCategory::WrongAnswer, 2),
            give_up_request(),
            hint(4),
        ];
        let summary = summarize("s1", &events, fixed_time()).expect("summarize");
        assert_eq!(summary.outcome, SessionOutcome::GaveUp);
        assert_eq!(summary.hint_levels, vec![4]);
    }

    #[test]
    fn test_summary_no_attempts_is_incomplete() {
        let events = vec![started_at(fixed_time())];
        let summary = summarize("s1", &events, fixed_time()).expect("summarize");
        assert_eq!(summary.outcome, SessionOutcome::Incomplete);
        assert_eq!(summary.total_attempts, 0);
        assert_eq!(summary.duration_seconds, 0);
    }

    #[test]
    fn test_summary_pass_outranks_give_up() {
        // Passing after signalling give-up still counts as success.
        let events = vec![
            started_at(fixed_time()),
            give_up_request(),
            hint(4),
            eval(FailureCategory::Pass, 12),
        ];
        let summary = summarize("s1", &events, fixed_time()).expect("summarize");
        assert_eq!(summary.outcome, SessionOutcome::Success);
    }
}
