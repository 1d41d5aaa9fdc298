//! Audit log - append-only JSONL trail of fraud events
//!
//! Each line is one JSON-serialized [`FraudEvent`]. The file is append-only
//! and never modified; terminal records stay for audit. An in-memory mode
//! exists for tests and for deployments that ship audit elsewhere.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::EventResult;
use crate::event::FraudEvent;

/// Append-only JSONL audit log, shareable across threads
pub struct AuditLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl AuditLog {
    /// Create (or reopen for append) a log at the given path
    pub fn new(path: impl AsRef<Path>) -> EventResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    /// Create an in-memory log (for testing) - appends validate
    /// serialization but store nothing
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            file: Mutex::new(None),
        }
    }

    /// Append an event
    pub fn append(&self, event: &FraudEvent) -> EventResult<()> {
        let json = serde_json::to_string(event)?;
        let mut guard = self.file.lock().expect("audit log lock poisoned");
        if let Some(ref mut file) = *guard {
            writeln!(file, "{}", json)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Read all events back from disk
    pub fn read_all(&self) -> EventResult<Vec<FraudEvent>> {
        if self.is_in_memory() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut events = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(&line)?);
        }

        Ok(events)
    }

    /// Get the path to the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if this is an in-memory log
    pub fn is_in_memory(&self) -> bool {
        self.file.lock().expect("audit log lock poisoned").is_none()
    }
}
