//! Evaluation verdicts: failure categories and per-submission results.

use serde::{Deserialize, Serialize};

/// Closed classification of why a submission did or did not pass.
///
/// Assigned by [`crate::classifier::classify`] via a fixed-priority rule
/// list; every execution outcome maps to exactly one category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// All tests passed.
    Pass,

    /// At least half of the tests passed, but not all.
    PartialPass,

    /// Fewer than half of the tests passed, with no exception.
    WrongAnswer,

    /// An unhandled exception (or a forced timeout) during any test.
    Exception,

    /// Required class or methods absent or with incompatible signatures.
    WrongSignature,

    /// The candidate module could not be loaded at all.
    ImportError,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Pass => "pass",
            FailureCategory::PartialPass => "partial_pass",
            FailureCategory::WrongAnswer => "wrong_answer",
            FailureCategory::Exception => "exception",
            FailureCategory::WrongSignature => "wrong_signature",
            FailureCategory::ImportError => "import_error",
        }
    }

    /// True only for the fully passing category.
    pub fn is_pass(&self) -> bool {
        matches!(self, FailureCategory::Pass)
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of evaluating one submission against the fixed test battery.
///
/// Produced once per submission, immutable after creation, and appended to
/// the session log as the payload of an `EVAL_RESULT` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResult {
    /// Which submission this is, starting at 1 and monotonically
    /// increasing per session.
    pub attempt_number: u32,

    /// True if every test passed.
    pub passed: bool,

    /// Classification of the outcome.
    pub failure_category: FailureCategory,

    /// Number of tests that passed.
    pub tests_passed: u32,

    /// Number of tests that failed.
    pub tests_failed: u32,

    /// Identifiers of failing tests, in battery order.
    pub failing_tests: Vec<String>,

    /// Captured exception text, if any.
    pub exception: Option<String>,

    /// Wall-clock runtime of the whole evaluation in milliseconds.
    pub runtime_ms: u64,
}
