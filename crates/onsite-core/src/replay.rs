//! Replay: reconstructing session state from the event log.
//!
//! This is the core correctness property of the engine: for any sequence
//! of legal commands, driving a fresh state machine through the recorded
//! events yields a state identical to the one the live manager ended in.
//! The manager relies on it to restore an active session after a restart.

use sha2::{Digest, Sha256};

use crate::domain::{Event, EventType, OnsiteError, Result, SessionState};
use crate::state_machine::{Command, StateMachine};

/// Drive a fresh state machine through `events` and return the final
/// state.
///
/// An event that is illegal at its position means the log was not produced
/// by a legal command sequence: corruption, reported as a fatal error,
/// never papered over.
pub fn replay_state(events: &[Event]) -> Result<SessionState> {
    let mut machine = StateMachine::new();

    for (idx, event) in events.iter().enumerate() {
        let step = match event.event_type {
            EventType::SessionStarted => machine.apply(Command::Start).map(|_| ()),
            EventType::CodeSubmitted => machine.apply(Command::Submit).map(|_| ()),
            EventType::EvalResult => machine.evaluation_complete().map(|_| ()),
            EventType::HintRequested => machine.apply(Command::Hint).map(|_| ()),
            // Issued while awaiting action; no transition of their own.
            EventType::HintGiven | EventType::AgentResponse => {
                if machine.state() == SessionState::AwaitingAction {
                    Ok(())
                } else {
                    Err(crate::domain::SessionError::InvalidTransition {
                        state: machine.state(),
                        action: Command::Hint,
                    })
                }
            }
            EventType::SessionEnded => machine.apply(Command::End).map(|_| ()),
        };

        step.map_err(|e| {
            OnsiteError::Replay(format!(
                "event {} ({}) does not replay: {e}",
                idx + 1,
                event.event_type
            ))
        })?;
    }

    Ok(machine.state())
}

/// Deterministic SHA-256 hex digest over the serialized event sequence.
///
/// Two logs with identical events (including timestamps) produce identical
/// digests, which makes golden-equality checks cheap.
pub fn replay_digest(events: &[Event]) -> Result<String> {
    let bytes = serde_json::to_vec(events)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
