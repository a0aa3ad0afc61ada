//! Onsite Core Library
//!
//! Session orchestration engine for a command-driven coding interview:
//! a state machine governing what is legal when, an append-only event log
//! that makes every session exactly reconstructable, an isolated
//! code-evaluation sandbox, and a deterministic hint-escalation policy.
//!
//! The command surface and all display text live outside this crate; the
//! engine exposes only structured state, results, and decision tags.

pub mod agent;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod manager;
pub mod obs;
pub mod replay;
pub mod sandbox;
pub mod state_machine;
pub mod store;
pub mod summary;
pub mod telemetry;

pub use agent::{
    decide_after_eval, decide_hint, decide_hint_level, observe, AgentContext, AgentDecision,
};
pub use classifier::{build_result, classify};
pub use config::ManagerConfig;
pub use domain::{
    EvaluationResult, Event, EventType, FailureCategory, OnsiteError, Result, Session,
    SessionError, SessionOutcome, SessionState, SessionSummary,
};
pub use manager::{ReadModel, SessionManager};
pub use replay::{replay_digest, replay_state};
pub use sandbox::{
    CaseOutcome, CodeEvaluator, ExecOutcome, ExecReport, ProcessSandbox, SandboxConfig,
    SandboxError,
};
pub use state_machine::{Command, StateMachine};
pub use store::{ActiveSessionPointer, EventLog, JsonlEventLog, StoreError};
pub use summary::summarize;
pub use telemetry::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
