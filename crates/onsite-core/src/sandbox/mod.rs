//! Evaluation sandbox: isolated execution of candidate code against the
//! fixed test battery.
//!
//! Candidate code runs in a child interpreter process with a hard
//! wall-clock deadline and an address-space cap; the parent blocks on it
//! and unconditionally kills it on expiry. Whatever the candidate does
//! (loop forever, throw, exit, allocate without bound) comes back as a
//! structured [`ExecOutcome`], never as a crash of the orchestrator.
//!
//! # Modules
//!
//! - [`harness`] — the generated in-child test harness and the battery
//! - [`outcome`] — `ExecOutcome` / `CaseOutcome` / `ExecReport`
//! - [`runner`]  — `ProcessSandbox`, the real `CodeEvaluator`
//! - [`error`]   — `SandboxError` (infrastructure faults only)

pub mod error;
pub mod harness;
pub mod outcome;
pub mod runner;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::{SandboxError, SandboxResult};
pub use outcome::{CaseOutcome, ExecOutcome, ExecReport};
pub use runner::ProcessSandbox;

/// Configuration for sandboxed evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SandboxConfig {
    /// Hard wall-clock deadline for the whole run (milliseconds).
    pub timeout_ms: u64,

    /// Address-space cap applied inside the child (bytes).
    pub memory_limit_bytes: u64,

    /// Interpreter binary to spawn.
    pub python_bin: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            memory_limit_bytes: 256 * 1024 * 1024,
            python_bin: "python3".to_string(),
        }
    }
}

/// Seam between the session manager and code evaluation.
///
/// The process sandbox is the real implementation;
/// `crate::fakes::ScriptedEvaluator` stands in for it in tests.
#[async_trait]
pub trait CodeEvaluator: Send + Sync {
    /// Evaluate the candidate source at `candidate` and return the raw
    /// execution report. Only infrastructure faults (spawn failure,
    /// unreadable report) are errors; everything the candidate does wrong
    /// is data in the report.
    async fn evaluate(&self, candidate: &Path) -> SandboxResult<ExecReport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sandbox_config_default() {
        let config = SandboxConfig::default();
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.memory_limit_bytes, 256 * 1024 * 1024);
        assert_eq!(config.python_bin, "python3");
    }

    #[test]
    fn test_sandbox_config_serde_roundtrip() {
        let config = SandboxConfig {
            timeout_ms: 2_000,
            memory_limit_bytes: 64 * 1024 * 1024,
            python_bin: "python3.12".to_string(),
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: SandboxConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, back);
    }
}
