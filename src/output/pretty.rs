use colored::Colorize;

use super::TimerView;
use crate::routing::Disposal;
use crate::timer::{format_hms, TimerRef, TimerState};
use crate::tracker::SaveOutcome;

fn state_icon(state: TimerState) -> colored::ColoredString {
    match state {
        TimerState::Running => "●".green(),
        TimerState::Paused => "❚❚".yellow(),
        TimerState::NeverStarted => "○".white(),
    }
}

fn tags_suffix(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let tags_str = tags
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("  {}", tags_str.cyan())
}

/// Format the timer list as a pretty table
pub fn format_timers_pretty(timers: &[TimerView]) -> String {
    if timers.is_empty() {
        return "Timers (0)\n  No timers".to_string();
    }

    let mut output = format!("Timers ({})\n", timers.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for timer in timers {
        let duration = if timer.state == TimerState::Running {
            timer.formatted.bold().to_string()
        } else {
            timer.formatted.dimmed().to_string()
        };
        output.push_str(&format!(
            "{} {}  {}{}\n",
            state_icon(timer.state),
            timer.id.bold(),
            duration,
            tags_suffix(&timer.tags)
        ));
    }

    output
}

/// Format the result of a lifecycle command
pub fn format_action_pretty(action: &str, timer: &TimerView, changed: bool) -> String {
    let marker = if changed { "✓".green() } else { "·".dimmed() };
    let mut line = format!(
        "{} {} {}  {}",
        marker,
        action,
        timer.id.bold(),
        timer.formatted
    );
    if !changed {
        line.push_str(&format!("  {}", "(no change)".dimmed()));
    }
    line.push_str(&tags_suffix(&timer.tags));
    line
}

/// Format the running-timer status
pub fn format_status_pretty(running: Option<&TimerView>, line: &str) -> String {
    match running {
        Some(timer) => format!("{} {}", state_icon(timer.state), line),
        None => line.dimmed().to_string(),
    }
}

/// Format a save outcome
pub fn format_saved_pretty(outcome: &SaveOutcome) -> String {
    let entry = &outcome.entry;
    let mut output = format!(
        "{} Saved {}  {}  → {}",
        "✓".green(),
        entry.id.bold(),
        format_hms(entry.duration).yellow(),
        outcome.routed.sink
    );
    if outcome.routed.disposal == Disposal::Keep {
        output.push_str(&format!("  {}", "(kept)".dimmed()));
    }
    output
}

/// Format deleted timers
pub fn format_deleted_pretty(removed: &[TimerRef]) -> String {
    match removed {
        [] => "No timers deleted".dimmed().to_string(),
        [timer] => format!("{} Deleted {}", "✓".green(), timer.id.bold()),
        _ => {
            let ids = removed
                .iter()
                .map(|t| t.id.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} Deleted {} timers: {}", "✓".green(), removed.len(), ids)
        }
    }
}

/// Format a pomodoro round
pub fn format_pomodoro_pretty(timer: &TimerView, remaining: u64) -> String {
    let left = if remaining == 0 {
        "round complete".red().bold().to_string()
    } else {
        format!("{} left", format_hms(remaining)).yellow().to_string()
    };
    format!("🍅 {}  {}  {}", timer.id.bold(), timer.formatted, left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Routed, SavedEntry};
    use chrono::{TimeZone, Utc};

    fn view(id: &str, state: TimerState, tags: &[&str]) -> TimerView {
        TimerView {
            id: id.to_string(),
            state,
            duration: 65,
            formatted: "00:01:05".to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
            started_at: None,
        }
    }

    #[test]
    fn test_empty_timers() {
        let result = format_timers_pretty(&[]);
        assert!(result.contains("Timers (0)"));
        assert!(result.contains("No timers"));
    }

    #[test]
    fn test_timers_table() {
        let timers = vec![
            view("write-docs", TimerState::Running, &["jira"]),
            view("later", TimerState::NeverStarted, &[]),
        ];
        let result = format_timers_pretty(&timers);

        assert!(result.contains("Timers (2)"));
        assert!(result.contains("write-docs"));
        assert!(result.contains("00:01:05"));
        assert!(result.contains("#jira"));
        assert!(result.contains("later"));
    }

    #[test]
    fn test_action_unchanged_is_marked() {
        let result = format_action_pretty("Started", &view("a", TimerState::Running, &[]), false);
        assert!(result.contains("(no change)"));
    }

    #[test]
    fn test_saved_kept() {
        let outcome = SaveOutcome {
            entry: SavedEntry {
                id: "focus".to_string(),
                duration: 300,
                started_at: None,
                tags: vec!["pomodoro".to_string()],
                saved_at: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
            },
            routed: Routed {
                sink: "journal".to_string(),
                disposal: Disposal::Keep,
            },
        };
        let result = format_saved_pretty(&outcome);
        assert!(result.contains("focus"));
        assert!(result.contains("00:05:00"));
        assert!(result.contains("(kept)"));
    }

    #[test]
    fn test_deleted_many() {
        let removed = vec![
            TimerRef {
                id: "a".to_string(),
                tags: vec![],
            },
            TimerRef {
                id: "b".to_string(),
                tags: vec![],
            },
        ];
        let result = format_deleted_pretty(&removed);
        assert!(result.contains("Deleted 2 timers: a, b"));
    }

    #[test]
    fn test_pomodoro_complete() {
        let result = format_pomodoro_pretty(&view("focus", TimerState::Running, &[]), 0);
        assert!(result.contains("round complete"));
    }
}
