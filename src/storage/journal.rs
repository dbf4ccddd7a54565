//! Markdown journal of saved timers.
//!
//! Entries are grouped under one `## YYYY-MM-DD` header per day:
//!
//! ```text
//! ## 2024-05-06
//!
//! write-docs: `01:30:00`
//! review: `00:10:00`
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::TrackerError;
use crate::timer::format_hms;

/// Appends saved timers to a markdown file.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Create a journal backed by `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the journal file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Day header for a date.
    #[must_use]
    pub fn header(date: NaiveDate) -> String {
        format!("## {}", date.format("%Y-%m-%d"))
    }

    /// One journal line.
    #[must_use]
    pub fn line(id: &str, seconds: u64) -> String {
        format!("{id}: `{}`", format_hms(seconds))
    }

    /// Append an entry under the header for `date`, adding the header if
    /// the file does not have it yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal cannot be read or written.
    pub fn append(&self, date: NaiveDate, id: &str, seconds: u64) -> Result<(), TrackerError> {
        let header = Self::header(date);
        let line = Self::line(id, seconds);

        if !self.path.exists() {
            std::fs::write(&self.path, format!("{header}\n\n{line}"))?;
            return Ok(());
        }

        let mut content = std::fs::read_to_string(&self.path)?;
        if !content.contains(&header) {
            if !content.trim().is_empty() {
                content.push_str("\n\n");
            }
            content.push_str(&header);
            content.push('\n');
        }
        content.push('\n');
        content.push_str(&line);

        std::fs::write(&self.path, content)?;
        Ok(())
    }
}
