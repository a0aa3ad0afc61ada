//! In-memory fakes for the storage and evaluator seams (testing only).
//!
//! `MemoryEventLog` satisfies the [`EventLog`] contract without touching
//! the filesystem; `ScriptedEvaluator` returns pre-queued outcomes instead
//! of spawning an interpreter.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::Event;
use crate::sandbox::{CodeEvaluator, ExecReport, SandboxResult};
use crate::store::{EventLog, StoreResult};

// ---------------------------------------------------------------------------
// MemoryEventLog
// ---------------------------------------------------------------------------

/// In-memory event log backed by a `HashMap<session_id, Vec<Event>>`.
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    sessions: Mutex<HashMap<String, Vec<Event>>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventLog for MemoryEventLog {
    async fn append(&self, event: &Event) -> StoreResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions
            .entry(event.session_id.clone())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn load(&self, session_id: &str) -> StoreResult<Vec<Event>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    async fn session_exists(&self, session_id: &str) -> StoreResult<bool> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.contains_key(session_id))
    }

    async fn list_sessions(&self) -> StoreResult<Vec<String>> {
        let sessions = self.sessions.lock().unwrap();
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// ScriptedEvaluator
// ---------------------------------------------------------------------------

/// Evaluator fake that pops pre-queued reports in order.
///
/// Panics when the queue runs dry; a test that evaluates more times than
/// it scripted is a broken test.
#[derive(Debug, Default)]
pub struct ScriptedEvaluator {
    reports: Mutex<VecDeque<ExecReport>>,
}

impl ScriptedEvaluator {
    pub fn new(reports: impl IntoIterator<Item = ExecReport>) -> Self {
        Self {
            reports: Mutex::new(reports.into_iter().collect()),
        }
    }

    /// Queue one more report.
    pub fn push(&self, report: ExecReport) {
        self.reports.lock().unwrap().push_back(report);
    }

    /// Reports still queued.
    pub fn remaining(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

#[async_trait]
impl CodeEvaluator for ScriptedEvaluator {
    async fn evaluate(&self, _candidate: &Path) -> SandboxResult<ExecReport> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedEvaluator queue exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventType;
    use crate::sandbox::ExecOutcome;

    #[tokio::test]
    async fn test_memory_log_roundtrip() {
        let log = MemoryEventLog::new();
        let event = Event::new("s1", EventType::SessionStarted, serde_json::json!({}));

        log.append(&event).await.expect("append");
        let events = log.load("s1").await.expect("load");
        assert_eq!(events, vec![event]);
        assert!(log.session_exists("s1").await.expect("exists"));
        assert!(!log.session_exists("s2").await.expect("exists"));
    }

    #[tokio::test]
    async fn test_scripted_evaluator_pops_in_order() {
        let evaluator = ScriptedEvaluator::new([
            ExecReport::new(ExecOutcome::TimedOut { elapsed_ms: 5 }, 5),
            ExecReport::new(ExecOutcome::Completed { cases: vec![] }, 9),
        ]);

        let first = evaluator.evaluate(Path::new("a.py")).await.expect("first");
        assert!(matches!(first.outcome, ExecOutcome::TimedOut { .. }));
        let second = evaluator.evaluate(Path::new("a.py")).await.expect("second");
        assert!(matches!(second.outcome, ExecOutcome::Completed { .. }));
        assert_eq!(evaluator.remaining(), 0);
    }
}
