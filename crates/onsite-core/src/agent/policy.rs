//! Decision: the hint-escalation policy and post-evaluation responses.
//!
//! Pure functions of observable history. All applicable escalation rules
//! are evaluated and the maximum level taken; the result is floored at the
//! last given level, so hints never de-escalate within a session.

use serde::{Deserialize, Serialize};

use crate::domain::{EvaluationResult, FailureCategory};

use super::context::AgentContext;

/// Highest hint level: the full reference approach.
pub const MAX_HINT_LEVEL: u8 = 4;

/// Structured output of the policy. Transient: persisted only as the
/// consequence events it produces (`HINT_GIVEN`, `AGENT_RESPONSE`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentDecision {
    /// Reveal guidance at the given level (1–4).
    GiveHint { level: u8 },

    /// Respond to a failed attempt; `category` keys the wording table.
    GiveFeedback { category: FailureCategory },

    /// The solution passed; offer to conclude the session.
    OfferEnd,
}

/// Compute the hint level for a hint request.
///
/// Rules (maximum of all that apply, capped at 4):
/// - no prior hint: base level 1; otherwise base = last given level
/// - the same failure category recurred twice or more since the last
///   hint: one level above the last given hint
/// - attempt count >= 3: at least 2
/// - attempt count >= 5: at least 3
/// - attempt count >= 7, or an explicit give-up signal: 4
pub fn decide_hint_level(ctx: &AgentContext, give_up: bool) -> u8 {
    let mut level = ctx.last_hint_level.unwrap_or(1);

    if let Some(last) = ctx.last_hint_level {
        if has_recurring_failure(&ctx.failures_since_last_hint) {
            level = level.max(last.saturating_add(1));
        }
    }
    if ctx.attempt_count >= 3 {
        level = level.max(2);
    }
    if ctx.attempt_count >= 5 {
        level = level.max(3);
    }
    if ctx.attempt_count >= 7 || give_up {
        level = MAX_HINT_LEVEL;
    }

    level.min(MAX_HINT_LEVEL)
}

/// Whether any single category appears at least twice.
fn has_recurring_failure(failures: &[FailureCategory]) -> bool {
    failures
        .iter()
        .any(|cat| failures.iter().filter(|c| *c == cat).count() >= 2)
}

/// Decision for a hint request.
pub fn decide_hint(ctx: &AgentContext, give_up: bool) -> AgentDecision {
    AgentDecision::GiveHint {
        level: decide_hint_level(ctx, give_up),
    }
}

/// Decision issued right after an evaluation completes.
pub fn decide_after_eval(result: &EvaluationResult) -> AgentDecision {
    if result.passed {
        AgentDecision::OfferEnd
    } else {
        AgentDecision::GiveFeedback {
            category: result.failure_category,
        }
    }
}
