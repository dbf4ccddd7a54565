//! Timer snapshot persistence.
//!
//! The snapshot lives in `timers.json` as `{ "timers": [ ... ] }`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;
use crate::timer::TimerRecord;

/// On-disk layout of the snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub timers: Vec<TimerRecord>,
}

/// Reads and writes the timer snapshot.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store backed by `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored timer records.
    ///
    /// A missing file yields no records. A file that cannot be parsed is
    /// logged and also yields no records, which leaves a restoring manager
    /// untouched rather than wiping it.
    ///
    /// # Errors
    ///
    /// Returns an error only if an existing file cannot be read.
    pub fn load(&self) -> Result<Vec<TimerRecord>, TrackerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<StoredState>(&contents) {
            Ok(state) => Ok(state.timers),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable timer state: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Write timer records, replacing the previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn save(&self, timers: Vec<TimerRecord>) -> Result<(), TrackerError> {
        let contents = serde_json::to_string_pretty(&StoredState { timers })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            TrackerError::Storage(format!(
                "Failed to replace {}: {e}",
                self.path.display()
            ))
        })?;

        tracing::debug!(path = %self.path.display(), "timer state written");
        Ok(())
    }
}
