//! The interviewer agent's observe/decide loop.
//!
//! `context` derives the observable history from the event log; `policy`
//! turns it into a structured decision. Both are pure: the policy emits
//! only tags (hint level, failure category), never text. Wording is a
//! static lookup owned by the command surface.

pub mod context;
pub mod policy;

pub use context::{observe, AgentContext};
pub use policy::{decide_after_eval, decide_hint, decide_hint_level, AgentDecision};
