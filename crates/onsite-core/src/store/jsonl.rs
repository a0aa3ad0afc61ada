//! Filesystem event log: one append-only JSONL file per session.
//!
//! Layout: `<data_dir>/sessions/<session_id>.jsonl`, one JSON object per
//! line, in append order. Files are never rewritten.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::Event;

use super::{EventLog, StoreError, StoreResult};

/// Durable JSONL-backed event log.
///
/// Each append serializes the event, writes the full line, and fsyncs
/// before returning, so an acknowledged append survives a crash. A crash
/// mid-write can at worst leave a partial trailing line, which `load`
/// rejects as corruption rather than skipping.
#[derive(Debug)]
pub struct JsonlEventLog {
    sessions_dir: PathBuf,
}

impl JsonlEventLog {
    /// Open (creating if needed) the log rooted at `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let sessions_dir = data_dir.as_ref().join("sessions");
        std::fs::create_dir_all(&sessions_dir).map_err(|e| StoreError::io(&sessions_dir, e))?;
        Ok(Self { sessions_dir })
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn session_file(&self, session_id: &str) -> PathBuf {
        self.sessions_dir.join(format!("{session_id}.jsonl"))
    }
}

#[async_trait]
impl EventLog for JsonlEventLog {
    async fn append(&self, event: &Event) -> StoreResult<()> {
        let path = self.session_file(&event.session_id);

        let mut line = serde_json::to_string(event).map_err(|e| StoreError::Corrupt {
            path: path.clone(),
            line: 0,
            message: e.to_string(),
        })?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(&path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| StoreError::io(&path, e))?;
        // Durable before acknowledged.
        file.sync_all().map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }

    async fn load(&self, session_id: &str) -> StoreResult<Vec<Event>> {
        let path = self.session_file(session_id);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        let mut events = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let event: Event = serde_json::from_str(line).map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                line: idx + 1,
                message: e.to_string(),
            })?;
            events.push(event);
        }
        Ok(events)
    }

    async fn session_exists(&self, session_id: &str) -> StoreResult<bool> {
        Ok(self.session_file(session_id).exists())
    }

    async fn list_sessions(&self) -> StoreResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.sessions_dir)
            .map_err(|e| StoreError::io(&self.sessions_dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.sessions_dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
