//! Static display text: the problem statement and the hint/feedback
//! wording tables.
//!
//! The engine emits only structured tags (failure category, hint level);
//! everything a human reads is looked up here.

use onsite_core::{FailureCategory, SessionOutcome};

/// The problem statement shown at session start.
pub fn problem_statement() -> &'static str {
    "Implement an LRU (Least Recently Used) cache in Python.\n\
     \n\
     Define a class `LRUCache` with:\n\
       * `__init__(capacity: int)` - a fixed positive capacity\n\
       * `get(key: int) -> int`    - return the value, or -1 if absent;\n\
                                     a hit makes the key most recently used\n\
       * `put(key: int, value: int) -> None` - insert or update the key as\n\
                                     most recently used; when over capacity,\n\
                                     evict the least recently used key\n\
     \n\
     Your solution is graded against 12 fixed test cases covering lookups,\n\
     updates, eviction order, and recency refresh on both reads and writes."
}

/// Graded hint wording, keyed by level (1-4). Level 4 is the full
/// reference approach.
pub fn hint_text(level: u8) -> &'static str {
    match level {
        1 => "Think about what 'least recently used' means for *reads* as \
              well as writes. Which standard-library container keeps \
              insertion order and lets you move an entry cheaply?",
        2 => "Combine a hash map (O(1) lookup) with an ordering structure. \
              In Python, collections.OrderedDict gives you both: \
              move_to_end() refreshes recency, popitem(last=False) drops \
              the oldest entry.",
        3 => "On get(): if the key is missing return -1, otherwise \
              move_to_end(key) and return the value. On put(): if the key \
              exists, move_to_end(key); set the value; if the size now \
              exceeds capacity, popitem(last=False).",
        _ => "Reference approach:\n\
              \n\
              from collections import OrderedDict\n\
              \n\
              class LRUCache:\n\
                  def __init__(self, capacity):\n\
                      self.capacity = capacity\n\
                      self.data = OrderedDict()\n\
              \n\
                  def get(self, key):\n\
                      if key not in self.data:\n\
                          return -1\n\
                      self.data.move_to_end(key)\n\
                      return self.data[key]\n\
              \n\
                  def put(self, key, value):\n\
                      if key in self.data:\n\
                          self.data.move_to_end(key)\n\
                      self.data[key] = value\n\
                      if len(self.data) > self.capacity:\n\
                          self.data.popitem(last=False)",
    }
}

/// Feedback wording, keyed by failure category.
pub fn feedback_text(category: FailureCategory) -> &'static str {
    match category {
        FailureCategory::Pass => {
            "All tests passed. You can end the session to see your summary, \
             or keep refining your solution."
        }
        FailureCategory::PartialPass => {
            "More than half the tests pass. The failures cluster around \
             recency: remember that reads, not just writes, must refresh an \
             entry's position."
        }
        FailureCategory::WrongAnswer => {
            "Most tests are failing. Re-read the eviction rules: when the \
             cache is over capacity, exactly the least recently used key \
             must go."
        }
        FailureCategory::Exception => {
            "Your code raised an exception (or ran past the time limit) \
             during the tests. Check key-missing handling in get() and any \
             unbounded loops."
        }
        FailureCategory::WrongSignature => {
            "The required interface is incomplete. The class LRUCache must \
             expose __init__(capacity), get(key), and put(key, value)."
        }
        FailureCategory::ImportError => {
            "Your file could not be loaded at all - typically a syntax \
             error. Fix the reported error and submit again."
        }
    }
}

/// Human wording for a session outcome.
pub fn outcome_text(outcome: SessionOutcome) -> &'static str {
    match outcome {
        SessionOutcome::Success => "Success! All tests passing.",
        SessionOutcome::PartialSuccess => "Partial success - most tests passing.",
        SessionOutcome::GaveUp => "Ended after giving up.",
        SessionOutcome::Incomplete => "Ended without a passing attempt.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hint_level_has_text() {
        for level in 1..=4u8 {
            assert!(!hint_text(level).is_empty());
        }
        // Out-of-range levels fall back to the reference approach.
        assert_eq!(hint_text(9), hint_text(4));
    }

    #[test]
    fn test_every_category_has_feedback() {
        for category in [
            FailureCategory::Pass,
            FailureCategory::PartialPass,
            FailureCategory::WrongAnswer,
            FailureCategory::Exception,
            FailureCategory::WrongSignature,
            FailureCategory::ImportError,
        ] {
            assert!(!feedback_text(category).is_empty());
        }
    }

    #[test]
    fn test_problem_statement_names_the_interface() {
        let statement = problem_statement();
        assert!(statement.contains("LRUCache"));
        assert!(statement.contains("get"));
        assert!(statement.contains("put"));
    }
}
