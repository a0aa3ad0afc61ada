//! Failure classification: a total, order-sensitive mapping from raw
//! execution outcomes to exactly one [`FailureCategory`].
//!
//! Rules are evaluated in fixed priority order; the first match wins. An
//! exception during test 3 classifies as `Exception` even if tests 1–2
//! passed, and a timeout always outranks any partial count.

use crate::domain::{EvaluationResult, FailureCategory};
use crate::sandbox::{CaseOutcome, ExecOutcome, ExecReport};

/// Classify a raw outcome. Priority order:
/// 1. candidate could not be loaded        -> `ImportError`
/// 2. required interface absent            -> `WrongSignature`
/// 3. timeout, fault, or any case error    -> `Exception`
/// 4. all cases passed                     -> `Pass`
/// 5. at least half passed                 -> `PartialPass`
/// 6. otherwise                            -> `WrongAnswer`
pub fn classify(outcome: &ExecOutcome) -> FailureCategory {
    match outcome {
        ExecOutcome::LoadFailure { .. } => FailureCategory::ImportError,
        ExecOutcome::SignatureMismatch { .. } => FailureCategory::WrongSignature,
        ExecOutcome::TimedOut { .. } | ExecOutcome::Faulted { .. } => FailureCategory::Exception,
        ExecOutcome::Completed { cases } => {
            if cases.iter().any(|c| c.error.is_some()) {
                return FailureCategory::Exception;
            }
            let total = cases.len() as u32;
            let passed = cases.iter().filter(|c| c.passed).count() as u32;
            if total > 0 && passed == total {
                FailureCategory::Pass
            } else if passed * 2 >= total {
                FailureCategory::PartialPass
            } else {
                FailureCategory::WrongAnswer
            }
        }
    }
}

/// Fold a raw execution report into the immutable per-submission result
/// appended to the log.
pub fn build_result(attempt_number: u32, report: &ExecReport) -> EvaluationResult {
    let category = classify(&report.outcome);

    let (tests_passed, tests_failed, failing_tests, exception) = match &report.outcome {
        ExecOutcome::LoadFailure { message } => (0, 0, Vec::new(), Some(message.clone())),
        ExecOutcome::SignatureMismatch { missing } => (
            0,
            0,
            Vec::new(),
            Some(format!("missing or not callable: {}", missing.join(", "))),
        ),
        ExecOutcome::TimedOut { elapsed_ms } => (
            0,
            0,
            Vec::new(),
            Some(format!("evaluation timed out after {elapsed_ms}ms")),
        ),
        ExecOutcome::Faulted { message } => (0, 0, Vec::new(), Some(message.clone())),
        ExecOutcome::Completed { cases } => summarize_cases(cases),
    };

    EvaluationResult {
        attempt_number,
        passed: category.is_pass(),
        failure_category: category,
        tests_passed,
        tests_failed,
        failing_tests,
        exception,
        runtime_ms: report.runtime_ms,
    }
}

fn summarize_cases(cases: &[CaseOutcome]) -> (u32, u32, Vec<String>, Option<String>) {
    let passed = cases.iter().filter(|c| c.passed).count() as u32;
    let failed = cases.len() as u32 - passed;
    let failing = cases
        .iter()
        .filter(|c| !c.passed)
        .map(|c| c.id.clone())
        .collect();
    // First captured exception, in battery order.
    let exception = cases.iter().find_map(|c| c.error.clone());
    (passed, failed, failing, exception)
}
