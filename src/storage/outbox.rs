//! JSON-lines hand-off for external trackers.
//!
//! Ticket-system integrations pick saved timers up from `outbox.jsonl`,
//! one JSON object per line.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// A saved timer waiting for an external tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxEntry {
    pub id: String,
    /// Approximated duration in seconds
    pub duration: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

/// Append-only JSON-lines file.
#[derive(Debug, Clone)]
pub struct Outbox {
    path: PathBuf,
}

impl Outbox {
    /// Create an outbox backed by `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the outbox file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be serialized or written.
    pub fn push(&self, entry: &OutboxEntry) -> Result<(), TrackerError> {
        let line = serde_json::to_string(entry)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Read every pending entry. Unparseable lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing outbox cannot be read.
    pub fn entries(&self) -> Result<Vec<OutboxEntry>, TrackerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("skipping unreadable outbox line: {e}");
                    None
                }
            })
            .collect())
    }
}
