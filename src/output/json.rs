//! JSON output formatting for timetrack.

use serde::Serialize;
use serde_json::json;

use super::TimerView;
use crate::error::TrackerError;
use crate::routing::Disposal;
use crate::timer::{TimerRef, TimerState};
use crate::tracker::SaveOutcome;

/// Format the timer list as JSON
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_timers_json(timers: &[TimerView]) -> Result<String, TrackerError> {
    let running = timers
        .iter()
        .find(|t| t.state == TimerState::Running)
        .map(|t| &t.id);
    let output = json!({
        "count": timers.len(),
        "running": running,
        "timers": timers
    });
    to_json(&output)
}

/// Format a lifecycle command result as JSON
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_action_json(
    action: &str,
    timer: &TimerView,
    changed: bool,
) -> Result<String, TrackerError> {
    to_json(&json!({
        "action": action,
        "changed": changed,
        "timer": timer
    }))
}

/// Format the running-timer status as JSON
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_status_json(running: Option<&TimerView>) -> Result<String, TrackerError> {
    to_json(&json!({ "running": running }))
}

/// Format a save outcome as JSON
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_saved_json(outcome: &SaveOutcome) -> Result<String, TrackerError> {
    let entry = &outcome.entry;
    to_json(&json!({
        "action": "saved",
        "id": entry.id,
        "duration": entry.duration,
        "startedAt": entry.started_at,
        "savedAt": entry.saved_at,
        "tags": entry.tags,
        "sink": outcome.routed.sink,
        "kept": outcome.routed.disposal == Disposal::Keep
    }))
}

/// Format deleted timers as JSON
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_deleted_json(removed: &[TimerRef]) -> Result<String, TrackerError> {
    to_json(&json!({
        "action": "deleted",
        "count": removed.len(),
        "timers": removed
    }))
}

/// Format a pomodoro round as JSON
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn format_pomodoro_json(timer: &TimerView, remaining: u64) -> Result<String, TrackerError> {
    to_json(&json!({
        "action": "pomodoro",
        "remaining": remaining,
        "timer": timer
    }))
}

/// Serialize any value as pretty JSON.
///
/// # Errors
///
/// Returns `TrackerError::Json` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TrackerError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Routed, SavedEntry};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn view(id: &str, state: TimerState) -> TimerView {
        TimerView {
            id: id.to_string(),
            state,
            duration: 3661,
            formatted: "01:01:01".to_string(),
            tags: vec!["jira".to_string()],
            started_at: None,
        }
    }

    #[test]
    fn test_timers_json() {
        let timers = vec![view("a", TimerState::Paused), view("b", TimerState::Running)];
        let parsed: Value = serde_json::from_str(&format_timers_json(&timers).unwrap()).unwrap();

        assert_eq!(parsed["count"], 2);
        assert_eq!(parsed["running"], "b");
        assert_eq!(parsed["timers"][0]["id"], "a");
        assert_eq!(parsed["timers"][0]["state"], "paused");
        assert_eq!(parsed["timers"][1]["state"], "running");
        assert_eq!(parsed["timers"][0]["startedAt"], Value::Null);
    }

    #[test]
    fn test_empty_timers_json() {
        let parsed: Value = serde_json::from_str(&format_timers_json(&[]).unwrap()).unwrap();
        assert_eq!(parsed["count"], 0);
        assert_eq!(parsed["running"], Value::Null);
    }

    #[test]
    fn test_status_json_without_timer() {
        let parsed: Value = serde_json::from_str(&format_status_json(None).unwrap()).unwrap();
        assert_eq!(parsed["running"], Value::Null);
    }

    #[test]
    fn test_saved_json() {
        let outcome = SaveOutcome {
            entry: SavedEntry {
                id: "PROJ-1".to_string(),
                duration: 900,
                started_at: None,
                tags: vec!["pomodoro".to_string()],
                saved_at: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
            },
            routed: Routed {
                sink: "outbox".to_string(),
                disposal: Disposal::Keep,
            },
        };

        let parsed: Value = serde_json::from_str(&format_saved_json(&outcome).unwrap()).unwrap();
        assert_eq!(parsed["id"], "PROJ-1");
        assert_eq!(parsed["duration"], 900);
        assert_eq!(parsed["sink"], "outbox");
        assert_eq!(parsed["kept"], true);
        assert_eq!(parsed["savedAt"], "2024-05-06T09:00:00Z");
    }

    #[test]
    fn test_deleted_json_lists_tags() {
        let removed = vec![TimerRef {
            id: "a".to_string(),
            tags: vec!["x".to_string()],
        }];
        let parsed: Value = serde_json::from_str(&format_deleted_json(&removed).unwrap()).unwrap();
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["timers"][0]["tags"][0], "x");
    }
}
