//! Process-isolated sandbox execution.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::error::{SandboxError, SandboxResult};
use super::harness::{HARNESS_SOURCE, REPORT_SENTINEL};
use super::outcome::{CaseOutcome, ExecOutcome, ExecReport};
use super::{CodeEvaluator, SandboxConfig};

/// Wire form of the harness report line.
#[derive(Debug, Deserialize)]
struct HarnessReport {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    missing: Option<Vec<String>>,
    #[serde(default)]
    cases: Option<Vec<CaseOutcome>>,
}

impl HarnessReport {
    fn into_outcome(self) -> ExecOutcome {
        match self.status.as_str() {
            "load_failure" => ExecOutcome::LoadFailure {
                message: self.message.unwrap_or_default(),
            },
            "signature_mismatch" => ExecOutcome::SignatureMismatch {
                missing: self.missing.unwrap_or_default(),
            },
            "completed" => ExecOutcome::Completed {
                cases: self.cases.unwrap_or_default(),
            },
            other => ExecOutcome::Faulted {
                message: format!("unknown report status: {other}"),
            },
        }
    }
}

/// The real evaluator: spawns an interpreter child per submission.
///
/// The child is spawned with `kill_on_drop`, so expiring the deadline (or
/// dropping the future for any reason) reclaims the process; this is the
/// sole cancellation path in the system.
#[derive(Debug)]
pub struct ProcessSandbox {
    config: SandboxConfig,
}

impl ProcessSandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Scan captured stdout for the sentinel report line. Candidate prints
    /// may precede it; the last report line wins.
    fn extract_report(stdout: &str) -> Option<&str> {
        stdout
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix(REPORT_SENTINEL))
    }
}

#[async_trait]
impl CodeEvaluator for ProcessSandbox {
    async fn evaluate(&self, candidate: &Path) -> SandboxResult<ExecReport> {
        // Stage the harness into a fresh scratch dir.
        let scratch = tempfile::tempdir().map_err(SandboxError::Harness)?;
        let harness_path = scratch.path().join("harness.py");
        std::fs::write(&harness_path, HARNESS_SOURCE).map_err(SandboxError::Harness)?;

        let started = Instant::now();
        let child = Command::new(&self.config.python_bin)
            .arg("-I")
            .arg(&harness_path)
            .arg(candidate)
            .arg(self.config.memory_limit_bytes.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SandboxError::Spawn {
                bin: self.config.python_bin.clone(),
                source: e,
            })?;

        let deadline = Duration::from_millis(self.config.timeout_ms);
        let output = match tokio::time::timeout(deadline, child.wait_with_output()).await {
            Ok(waited) => waited.map_err(SandboxError::Child)?,
            Err(_elapsed) => {
                // Deadline expired: the dropped future kills the child.
                let elapsed_ms = started.elapsed().as_millis() as u64;
                debug!(candidate = %candidate.display(), elapsed_ms, "evaluation timed out");
                return Ok(ExecReport::new(
                    ExecOutcome::TimedOut { elapsed_ms },
                    elapsed_ms,
                ));
            }
        };

        let runtime_ms = started.elapsed().as_millis() as u64;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let outcome = match Self::extract_report(&stdout) {
            Some(line) => serde_json::from_str::<HarnessReport>(line)
                .map_err(SandboxError::MalformedReport)?
                .into_outcome(),
            None if output.status.success() => {
                // The harness always reports on a clean exit; a silent one
                // is an infrastructure fault, not a candidate verdict.
                return Err(SandboxError::MissingReport {
                    stderr: stderr.trim().to_string(),
                });
            }
            None => ExecOutcome::Faulted {
                message: match output.status.code() {
                    Some(code) => format!("child exited with code {code}: {}", stderr.trim()),
                    None => format!("child killed by signal: {}", stderr.trim()),
                },
            },
        };

        debug!(
            candidate = %candidate.display(),
            runtime_ms,
            "evaluation finished"
        );
        Ok(ExecReport::new(outcome, runtime_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_report_finds_last_sentinel_line() {
        let stdout = format!(
            "candidate noise\n{REPORT_SENTINEL}{{\"status\":\"completed\"}}\n",
        );
        let line = ProcessSandbox::extract_report(&stdout).expect("report line");
        assert_eq!(line, "{\"status\":\"completed\"}");
    }

    #[test]
    fn test_extract_report_none_without_sentinel() {
        assert!(ProcessSandbox::extract_report("just noise\n").is_none());
    }

    #[test]
    fn test_report_status_mapping() {
        let report: HarnessReport =
            serde_json::from_str("{\"status\":\"load_failure\",\"message\":\"boom\"}")
                .expect("parse");
        match report.into_outcome() {
            ExecOutcome::LoadFailure { message } => assert_eq!(message, "boom"),
            other => panic!("expected LoadFailure, got {other:?}"),
        }

        let report: HarnessReport =
            serde_json::from_str("{\"status\":\"signature_mismatch\",\"missing\":[\"get\"]}")
                .expect("parse");
        match report.into_outcome() {
            ExecOutcome::SignatureMismatch { missing } => assert_eq!(missing, vec!["get"]),
            other => panic!("expected SignatureMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_status_becomes_fault() {
        let report: HarnessReport =
            serde_json::from_str("{\"status\":\"wat\"}").expect("parse");
        match report.into_outcome() {
            ExecOutcome::Faulted { message } => assert!(message.contains("wat")),
            other => panic!("expected Faulted, got {other:?}"),
        }
    }
}
