//! Structured observability hooks for session lifecycle events.
//!
//! Emitted at `info!` level through `tracing`; configure verbosity with
//! `RUST_LOG` and format via [`crate::telemetry::init_tracing`].

use tracing::info;

/// RAII guard entering a session-scoped tracing span.
pub struct SessionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SessionSpan {
    /// Create and enter a span tagged with the session id.
    pub fn enter(session_id: &str) -> Self {
        let span = tracing::info_span!("onsite.session", session_id = %session_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: session started.
pub fn emit_session_started(session_id: &str, problem_id: &str) {
    info!(event = "session.started", session_id = %session_id, problem_id = %problem_id);
}

/// Emit event: one event appended to the session log.
pub fn emit_event_appended(session_id: &str, kind: &str) {
    info!(event = "session.event_appended", session_id = %session_id, kind = %kind);
}

/// Emit event: an evaluation finished and was classified.
pub fn emit_eval_finished(session_id: &str, attempt: u32, category: &str, runtime_ms: u64) {
    info!(
        event = "session.eval_finished",
        session_id = %session_id,
        attempt = attempt,
        category = %category,
        runtime_ms = runtime_ms,
    );
}

/// Emit event: a hint was issued.
pub fn emit_hint_given(session_id: &str, level: u8) {
    info!(event = "session.hint_given", session_id = %session_id, level = level);
}

/// Emit event: session ended.
pub fn emit_session_ended(session_id: &str, outcome: &str, total_attempts: u32) {
    info!(
        event = "session.ended",
        session_id = %session_id,
        outcome = %outcome,
        total_attempts = total_attempts,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_span_create() {
        // Just ensure SessionSpan::enter doesn't panic
        let _span = SessionSpan::enter("test-session-id");
    }
}
