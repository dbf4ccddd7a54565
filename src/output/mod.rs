//! Output formatting for timetrack.
//!
//! This module provides formatters for displaying timers in various formats.

mod json;
mod pretty;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::TrackerError;
use crate::timer::{Timer, TimerRef, TimerState};
use crate::tracker::SaveOutcome;

pub use json::*;
pub use pretty::*;

/// A timer as shown to the user at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub id: String,
    pub state: TimerState,
    /// Elapsed seconds
    pub duration: u64,
    /// Elapsed time as `HH:MM:SS`
    pub formatted: String,
    pub tags: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl TimerView {
    /// Sample a timer at `now`.
    #[must_use]
    pub fn of(timer: &Timer, now: DateTime<Utc>) -> Self {
        Self {
            id: timer.id().to_string(),
            state: timer.state(),
            duration: timer.duration_at(now),
            formatted: timer.formatted_duration_at(now),
            tags: timer.tags().to_vec(),
            started_at: timer.started_at(),
        }
    }
}

/// Format the timer list based on output format
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_timers(timers: &[TimerView], format: OutputFormat) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_timers_pretty(timers)),
        OutputFormat::Json => format_timers_json(timers),
    }
}

/// Format the result of a lifecycle command based on output format
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_action(
    action: &str,
    timer: &TimerView,
    changed: bool,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_action_pretty(action, timer, changed)),
        OutputFormat::Json => format_action_json(action, timer, changed),
    }
}

/// Format the running-timer status based on output format
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_status(
    running: Option<&TimerView>,
    line: &str,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(running, line)),
        OutputFormat::Json => format_status_json(running),
    }
}

/// Format a save outcome based on output format
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_saved(outcome: &SaveOutcome, format: OutputFormat) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_saved_pretty(outcome)),
        OutputFormat::Json => format_saved_json(outcome),
    }
}

/// Format deleted timers based on output format
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_deleted(removed: &[TimerRef], format: OutputFormat) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_deleted_pretty(removed)),
        OutputFormat::Json => format_deleted_json(removed),
    }
}

/// Format a pomodoro round based on output format
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_pomodoro(
    timer: &TimerView,
    remaining: u64,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_pomodoro_pretty(timer, remaining)),
        OutputFormat::Json => format_pomodoro_json(timer, remaining),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Clock, ManualClock};
    use crate::timer::TimerManager;
    use chrono::TimeZone;

    #[test]
    fn test_view_samples_timer() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap());
        let mut manager = TimerManager::with_clock(clock.clone());
        manager.create_new("a").unwrap();
        manager.add_tag("a", "jira").unwrap();
        manager.start("a").unwrap();
        clock.advance(75);

        let view = TimerView::of(manager.get_by_id("a").unwrap(), clock.now());
        assert_eq!(view.state, TimerState::Running);
        assert_eq!(view.duration, 75);
        assert_eq!(view.formatted, "00:01:15");
        assert_eq!(view.tags, vec!["jira"]);
        assert!(view.started_at.is_some());
    }
}
