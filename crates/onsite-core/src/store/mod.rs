//! Event persistence: the append-only per-session log and the
//! active-session pointer.
//!
//! The [`EventLog`] trait is backend-agnostic; [`JsonlEventLog`] is the
//! durable filesystem implementation and `crate::fakes::MemoryEventLog`
//! the in-memory one for tests.

pub mod jsonl;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::Event;

pub use jsonl::JsonlEventLog;

/// Result type for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors from the persistence layer. All of these are system faults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt event record in {} at line {line}: {message}", .path.display())]
    Corrupt {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Append-only, per-session, ordered event storage.
///
/// Guarantees:
/// - `append` writes durably before returning and preserves arrival order;
///   events are never dropped or reordered, even across process restarts.
/// - `load` returns the complete ordered sequence and is side-effect-free.
/// - A corrupt or partially written record fails loudly; it is never
///   silently skipped.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Durably append one event to its session's log.
    async fn append(&self, event: &Event) -> StoreResult<()>;

    /// Load all events for a session in append order. An unknown session
    /// yields an empty sequence.
    async fn load(&self, session_id: &str) -> StoreResult<Vec<Event>>;

    /// Whether any events exist for this session.
    async fn session_exists(&self, session_id: &str) -> StoreResult<bool>;

    /// Identifiers of every session with a log.
    async fn list_sessions(&self) -> StoreResult<Vec<String>>;
}

/// Persisted pointer to the single currently active (non-terminal)
/// session. Empty or absent means none.
///
/// Writes go through a temp file in the same directory followed by an
/// atomic rename, so the pointer is never observed half-written.
#[derive(Debug, Clone)]
pub struct ActiveSessionPointer {
    path: PathBuf,
}

impl ActiveSessionPointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the active session id, if one is recorded.
    pub fn load(&self) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let id = contents.trim();
                if id.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(id.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// Atomically record `session_id` as the active session.
    pub fn set(&self, session_id: &str) -> StoreResult<()> {
        use std::io::Write;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(session_id.as_bytes())
            .map_err(|e| StoreError::io(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        Ok(())
    }

    /// Clear the pointer. No-op when already clear.
    pub fn clear(&self) -> StoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}
