//! Session lifecycle coordination.
//!
//! The manager owns the single active-session pointer, applies commands
//! to the state machine, invokes the sandbox, appends events, and exposes
//! a read model after every command. It is single-threaded and
//! command-driven: one command runs to completion before the next is
//! accepted.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{self, AgentDecision};
use crate::classifier;
use crate::config::ManagerConfig;
use crate::domain::{
    EvaluationResult, Event, EventType, Result, Session, SessionError, SessionState,
    SessionSummary,
};
use crate::obs;
use crate::replay;
use crate::sandbox::{CodeEvaluator, ProcessSandbox};
use crate::state_machine::{Command, StateMachine};
use crate::store::{ActiveSessionPointer, EventLog, JsonlEventLog};
use crate::summary;

/// Snapshot handed back to the command surface after every command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadModel {
    pub session_id: String,
    pub state: SessionState,
    pub attempt_count: u32,
    pub hints_given: u32,
    pub last_result: Option<EvaluationResult>,
    /// Decision produced by the command, when it produced one.
    pub decision: Option<AgentDecision>,
    pub started_at: Option<DateTime<Utc>>,
}

struct ActiveSession {
    session: Session,
    machine: StateMachine,
}

/// Coordinates state machine, event log, sandbox, and hint policy.
///
/// Invariant: at most one session is active (non-terminal) per
/// installation. The persisted pointer is checked and set only inside
/// `start`/`end`, which run to completion one at a time.
pub struct SessionManager {
    log: Arc<dyn EventLog>,
    evaluator: Arc<dyn CodeEvaluator>,
    pointer: ActiveSessionPointer,
    problem_id: String,
    active: Option<ActiveSession>,
}

impl SessionManager {
    /// Open a manager on the durable log and process sandbox described by
    /// `config`, restoring any recorded active session by replay.
    pub async fn open(config: &ManagerConfig) -> Result<Self> {
        let log = Arc::new(JsonlEventLog::new(&config.data_dir)?);
        let evaluator = Arc::new(ProcessSandbox::new(config.sandbox.clone()));
        let pointer = ActiveSessionPointer::new(config.data_dir.join("active_session"));
        Self::with_parts(log, evaluator, pointer, config.problem_id.clone()).await
    }

    /// Assemble a manager from explicit parts. Test entry point: pass the
    /// in-memory fakes from [`crate::fakes`].
    pub async fn with_parts(
        log: Arc<dyn EventLog>,
        evaluator: Arc<dyn CodeEvaluator>,
        pointer: ActiveSessionPointer,
        problem_id: impl Into<String>,
    ) -> Result<Self> {
        let mut manager = Self {
            log,
            evaluator,
            pointer,
            problem_id: problem_id.into(),
            active: None,
        };
        manager.restore().await?;
        Ok(manager)
    }

    /// Restore the active session named by the pointer, if it still is
    /// one. A pointer to a missing or already sealed session is stale and
    /// gets cleared.
    async fn restore(&mut self) -> Result<()> {
        let Some(session_id) = self.pointer.load()? else {
            return Ok(());
        };

        let events = self.log.load(&session_id).await?;
        if events.is_empty() {
            self.pointer.clear()?;
            return Ok(());
        }

        let state = replay::replay_state(&events)?;
        if state == SessionState::Done {
            self.pointer.clear()?;
            return Ok(());
        }

        let problem_id = events[0]
            .payload
            .get("problem_id")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.problem_id)
            .to_string();

        self.active = Some(ActiveSession {
            session: Session {
                session_id,
                problem_id,
                created_at: events[0].timestamp,
            },
            machine: StateMachine::with_state(state),
        });
        Ok(())
    }

    /// Start a new session.
    ///
    /// Fails with `SessionAlreadyActive` while another session is live.
    pub async fn start(&mut self) -> Result<ReadModel> {
        if let Some(active) = &self.active {
            return Err(SessionError::SessionAlreadyActive(
                active.session.session_id.clone(),
            )
            .into());
        }

        let session = Session::new(self.problem_id.clone());
        let _span = obs::SessionSpan::enter(&session.session_id);

        // Pointer first: a crash before the first event leaves a pointer
        // to an empty session, which restore() clears as stale.
        self.pointer.set(&session.session_id)?;
        self.record(Event::new(
            session.session_id.clone(),
            EventType::SessionStarted,
            serde_json::json!({"problem_id": session.problem_id}),
        ))
        .await?;

        let mut machine = StateMachine::new();
        machine.apply(Command::Start)?;

        obs::emit_session_started(&session.session_id, &session.problem_id);
        self.active = Some(ActiveSession { session, machine });
        self.read_model(None).await
    }

    /// Submit candidate code for evaluation.
    pub async fn submit(&mut self, candidate: &Path) -> Result<ReadModel> {
        let session_id = self.require_active()?.session.session_id.clone();
        let _span = obs::SessionSpan::enter(&session_id);

        self.check_legal(Command::Submit)?;

        let events = self.log.load(&session_id).await?;
        let attempt = agent::observe(&events)?.attempt_count + 1;

        self.record(Event::new(
            session_id.clone(),
            EventType::CodeSubmitted,
            serde_json::json!({
                "path": candidate.display().to_string(),
                "attempt_number": attempt,
            }),
        ))
        .await?;
        self.active_mut()?.machine.apply(Command::Submit)?;

        let report = self.evaluator.evaluate(candidate).await?;
        let result = classifier::build_result(attempt, &report);

        self.record(Event::new(
            session_id.clone(),
            EventType::EvalResult,
            serde_json::to_value(&result)?,
        ))
        .await?;
        self.active_mut()?.machine.evaluation_complete()?;

        let decision = agent::decide_after_eval(&result);
        self.record(Event::new(
            session_id.clone(),
            EventType::AgentResponse,
            serde_json::to_value(&decision)?,
        ))
        .await?;

        obs::emit_eval_finished(
            &session_id,
            attempt,
            result.failure_category.as_str(),
            result.runtime_ms,
        );
        self.read_model(Some(decision)).await
    }

    /// Request a hint, optionally signalling give-up.
    pub async fn hint(&mut self, give_up: bool) -> Result<ReadModel> {
        let session_id = self.require_active()?.session.session_id.clone();
        let _span = obs::SessionSpan::enter(&session_id);

        self.check_legal(Command::Hint)?;

        let events = self.log.load(&session_id).await?;
        let ctx = agent::observe(&events)?;

        self.record(Event::new(
            session_id.clone(),
            EventType::HintRequested,
            serde_json::json!({"give_up": give_up}),
        ))
        .await?;

        let level = agent::decide_hint_level(&ctx, give_up);
        let category = ctx.last_eval.as_ref().map(|r| r.failure_category);
        self.record(Event::new(
            session_id.clone(),
            EventType::HintGiven,
            serde_json::json!({"level": level, "category": category}),
        ))
        .await?;
        self.active_mut()?.machine.apply(Command::Hint)?;

        obs::emit_hint_given(&session_id, level);
        self.read_model(Some(AgentDecision::GiveHint { level })).await
    }

    /// Report the current read model. Appends no event and changes no
    /// state.
    pub async fn status(&self) -> Result<ReadModel> {
        let active = self.require_active()?;
        if active.machine.peek(Command::Status).is_none() {
            return Err(SessionError::InvalidTransition {
                state: active.machine.state(),
                action: Command::Status,
            }
            .into());
        }
        self.read_model(None).await
    }

    /// End the active session, sealing it and clearing the pointer.
    pub async fn end(&mut self) -> Result<SessionSummary> {
        let session_id = self.require_active()?.session.session_id.clone();
        let _span = obs::SessionSpan::enter(&session_id);

        self.check_legal(Command::End)?;

        let events = self.log.load(&session_id).await?;
        let summary = summary::summarize(&session_id, &events, Utc::now())?;

        self.record(Event::new(
            session_id.clone(),
            EventType::SessionEnded,
            serde_json::to_value(&summary)?,
        ))
        .await?;
        self.active_mut()?.machine.apply(Command::End)?;

        self.pointer.clear()?;
        self.active = None;

        obs::emit_session_ended(&session_id, summary.outcome.as_str(), summary.total_attempts);
        Ok(summary)
    }

    /// Identifier of the active session, if any.
    pub fn active_session_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.session.session_id.as_str())
    }

    /// State of the active session, if any.
    pub fn current_state(&self) -> Option<SessionState> {
        self.active.as_ref().map(|a| a.machine.state())
    }

    fn require_active(&self) -> std::result::Result<&ActiveSession, SessionError> {
        self.active.as_ref().ok_or(SessionError::NoActiveSession)
    }

    fn active_mut(&mut self) -> std::result::Result<&mut ActiveSession, SessionError> {
        self.active.as_mut().ok_or(SessionError::NoActiveSession)
    }

    /// Reject the command now if the state machine would; guarantees no
    /// event is appended for an illegal command.
    fn check_legal(&self, command: Command) -> std::result::Result<(), SessionError> {
        let active = self.require_active()?;
        match active.machine.peek(command) {
            Some(_) => Ok(()),
            None => Err(SessionError::InvalidTransition {
                state: active.machine.state(),
                action: command,
            }),
        }
    }

    async fn record(&self, event: Event) -> Result<()> {
        obs::emit_event_appended(&event.session_id, event.event_type.as_str());
        self.log.append(&event).await?;
        Ok(())
    }

    async fn read_model(&self, decision: Option<AgentDecision>) -> Result<ReadModel> {
        let active = self.require_active()?;
        let events = self.log.load(&active.session.session_id).await?;
        let ctx = agent::observe(&events)?;

        Ok(ReadModel {
            session_id: active.session.session_id.clone(),
            state: active.machine.state(),
            attempt_count: ctx.attempt_count,
            hints_given: ctx.hints_given,
            last_result: ctx.last_eval,
            decision,
            started_at: events.first().map(|e| e.timestamp),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{MemoryEventLog, ScriptedEvaluator};
    use crate::sandbox::{CaseOutcome, ExecOutcome, ExecReport};

    fn completed(passed: u32, failed: u32) -> ExecReport {
        let mut cases = Vec::new();
        for i in 0..passed {
            cases.push(CaseOutcome {
                id: format!("test_pass_{i}"),
                passed: true,
                error: None,
            });
        }
        for i in 0..failed {
            cases.push(CaseOutcome {
                id: format!("test_fail_{i}"),
                passed: false,
                error: None,
            });
        }
        ExecReport::new(ExecOutcome::Completed { cases }, 30)
    }

    async fn manager_with(reports: Vec<ExecReport>) -> (tempfile::TempDir, SessionManager) {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = SessionManager::with_parts(
            Arc::new(MemoryEventLog::new()),
            Arc::new(ScriptedEvaluator::new(reports)),
            ActiveSessionPointer::new(dir.path().join("active_session")),
            "lru_cache",
        )
        .await
        .expect("manager");
        (dir, manager)
    }

    #[tokio::test]
    async fn test_start_presents_problem() {
        let (_dir, mut manager) = manager_with(vec![]).await;
        let model = manager.start().await.expect("start");

        assert_eq!(model.state, SessionState::ProblemPresented);
        assert_eq!(model.attempt_count, 0);
        assert_eq!(model.hints_given, 0);
        assert!(model.last_result.is_none());
    }

    #[tokio::test]
    async fn test_start_twice_rejected() {
        let (_dir, mut manager) = manager_with(vec![]).await;
        manager.start().await.expect("start");

        let err = manager.start().await.expect_err("second start must fail");
        assert!(matches!(
            err,
            crate::domain::OnsiteError::Session(SessionError::SessionAlreadyActive(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_produces_result_and_decision() {
        let (_dir, mut manager) = manager_with(vec![completed(12, 0)]).await;
        manager.start().await.expect("start");

        let model = manager.submit(Path::new("solution.py")).await.expect("submit");
        assert_eq!(model.state, SessionState::AwaitingAction);
        assert_eq!(model.attempt_count, 1);
        let result = model.last_result.expect("result");
        assert!(result.passed);
        assert_eq!(result.attempt_number, 1);
        assert_eq!(model.decision, Some(AgentDecision::OfferEnd));
    }

    #[tokio::test]
    async fn test_attempt_numbers_increase() {
        let (_dir, mut manager) = manager_with(vec![completed(4, 8), completed(5, 7)]).await;
        manager.start().await.expect("start");

        let first = manager.submit(Path::new("a.py")).await.expect("submit");
        assert_eq!(first.last_result.expect("result").attempt_number, 1);

        let second = manager.submit(Path::new("b.py")).await.expect("submit");
        assert_eq!(second.last_result.expect("result").attempt_number, 2);
        assert_eq!(second.attempt_count, 2);
    }

    #[tokio::test]
    async fn test_hint_before_submit_rejected() {
        let (_dir, mut manager) = manager_with(vec![]).await;
        manager.start().await.expect("start");

        let err = manager.hint(false).await.expect_err("hint must be illegal");
        assert!(matches!(
            err,
            crate::domain::OnsiteError::Session(SessionError::InvalidTransition {
                state: SessionState::ProblemPresented,
                action: Command::Hint,
            })
        ));
        // Nothing was recorded for the rejected command.
        let status_err = manager.status().await.expect_err("status illegal here too");
        assert!(status_err.is_session_error());
    }

    #[tokio::test]
    async fn test_command_without_session_rejected() {
        let (_dir, mut manager) = manager_with(vec![]).await;
        for err in [
            manager.submit(Path::new("a.py")).await.expect_err("submit"),
            manager.hint(false).await.expect_err("hint"),
            manager.status().await.expect_err("status"),
        ] {
            assert!(matches!(
                err,
                crate::domain::OnsiteError::Session(SessionError::NoActiveSession)
            ));
        }
    }

    #[tokio::test]
    async fn test_end_twice_rejected() {
        let (_dir, mut manager) = manager_with(vec![]).await;
        manager.start().await.expect("start");

        let summary = manager.end().await.expect("end");
        assert_eq!(summary.total_attempts, 0);
        assert!(manager.active_session_id().is_none());

        let err = manager.end().await.expect_err("second end must fail");
        assert!(matches!(
            err,
            crate::domain::OnsiteError::Session(SessionError::NoActiveSession)
        ));
    }

    #[tokio::test]
    async fn test_end_then_start_fresh_session() {
        let (_dir, mut manager) = manager_with(vec![]).await;
        let first = manager.start().await.expect("start");
        manager.end().await.expect("end");
        let second = manager.start().await.expect("restart");

        assert_ne!(first.session_id, second.session_id);
        assert_eq!(second.state, SessionState::ProblemPresented);
    }

    #[tokio::test]
    async fn test_status_reports_without_side_effects() {
        let (_dir, mut manager) = manager_with(vec![completed(4, 8)]).await;
        manager.start().await.expect("start");
        manager.submit(Path::new("a.py")).await.expect("submit");

        let before = manager.status().await.expect("status");
        let after = manager.status().await.expect("status again");
        assert_eq!(before.attempt_count, after.attempt_count);
        assert_eq!(before.state, SessionState::AwaitingAction);
        assert!(before.decision.is_none());
    }
}
