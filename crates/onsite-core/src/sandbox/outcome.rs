//! Raw execution outcomes, prior to classification.

use serde::{Deserialize, Serialize};

/// Result of one test case inside the battery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseOutcome {
    /// Stable test identifier, e.g. `test_eviction_order_simple`.
    pub id: String,

    /// Whether the case passed.
    pub passed: bool,

    /// Captured exception text, when the case died instead of merely
    /// failing its assertion.
    pub error: Option<String>,
}

/// What actually happened when the candidate was executed.
///
/// This is the total input domain of
/// [`crate::classifier::classify`]; every child run maps to exactly one
/// variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecOutcome {
    /// The candidate module could not be loaded; no tests ran.
    LoadFailure { message: String },

    /// The required class or methods are absent; no tests ran.
    SignatureMismatch { missing: Vec<String> },

    /// The child exceeded its time or memory bound and was killed.
    TimedOut { elapsed_ms: u64 },

    /// The child died without producing a report (killed by a signal,
    /// hard interpreter crash).
    Faulted { message: String },

    /// The battery ran to completion; each case recorded independently.
    Completed { cases: Vec<CaseOutcome> },
}

/// An outcome plus the wall-clock runtime of the whole child run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecReport {
    pub outcome: ExecOutcome,
    pub runtime_ms: u64,
}

impl ExecReport {
    pub fn new(outcome: ExecOutcome, runtime_ms: u64) -> Self {
        Self {
            outcome,
            runtime_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serde_tagging() {
        let outcome = ExecOutcome::SignatureMismatch {
            missing: vec!["put".to_string()],
        };
        let value = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(value["outcome"], "signature_mismatch");
        assert_eq!(value["missing"][0], "put");
    }

    #[test]
    fn test_report_roundtrip() {
        let report = ExecReport::new(
            ExecOutcome::Completed {
                cases: vec![CaseOutcome {
                    id: "test_put_then_get".to_string(),
                    passed: true,
                    error: None,
                }],
            },
            87,
        );
        let json = serde_json::to_string(&report).expect("serialize");
        let back: ExecReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(report, back);
    }
}
