//! Path resolution for timetrack configuration and data files.
//!
//! All timetrack data is stored in `~/.timetrack/` unless `TIMETRACK_HOME`
//! or `--data-dir` points elsewhere:
//! - `config.yaml` - Main configuration file
//! - `timers.json` - Snapshot of every live timer
//! - `outbox.jsonl` - Saved timers handed to external trackers
//! - the journal file named by `tracking.storage_file`

use std::path::{Path, PathBuf};

use crate::error::TrackerError;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "TIMETRACK_HOME";

/// Paths to timetrack configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.timetrack/`
    pub root: PathBuf,
    /// Config file: `~/.timetrack/config.yaml`
    pub config_file: PathBuf,
    /// Timer snapshot: `~/.timetrack/timers.json`
    pub state_file: PathBuf,
    /// External hand-off: `~/.timetrack/outbox.jsonl`
    pub outbox_file: PathBuf,
}

impl Paths {
    /// Create paths from `TIMETRACK_HOME` or the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TrackerError> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            if !root.trim().is_empty() {
                return Ok(Self::with_root(PathBuf::from(root)));
            }
        }

        let home = std::env::var("HOME").map_err(|_| {
            TrackerError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".timetrack")))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            state_file: root.join("timers.json"),
            outbox_file: root.join("outbox.jsonl"),
            root,
        }
    }

    /// Journal file for a configured storage name; `.md` is appended when missing.
    #[must_use]
    pub fn journal_file(&self, storage_file: &str) -> PathBuf {
        let name = if Path::new(storage_file)
            .extension()
            .is_some_and(|ext| ext == "md")
        {
            storage_file.to_string()
        } else {
            format!("{storage_file}.md")
        };
        self.root.join(name)
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TrackerError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                TrackerError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".timetrack"))
        })
    }
}
