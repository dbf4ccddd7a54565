//! Command implementations for timetrack.
//!
//! Every command takes an opened [`Tracker`] and returns the text to print.

mod shell;

pub use shell::completions;

use crate::cli::args::{OutputFormat, TagAction};
use crate::error::TrackerError;
use crate::output::{
    format_action, format_deleted, format_pomodoro, format_saved, format_status, format_timers,
    TimerView,
};
use crate::timer::parse_hms;
use crate::tracker::Tracker;

fn view(tracker: &Tracker, id: &str) -> Result<TimerView, TrackerError> {
    Ok(TimerView::of(tracker.timer(id)?, tracker.manager().now()))
}

/// Execute new command
///
/// # Errors
///
/// Returns an error if the id is blank or already taken.
pub fn new(
    tracker: &mut Tracker,
    id: &str,
    tags: &[String],
    no_start: bool,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    tracker.create(id, tags, !no_start)?;
    format_action("Created", &view(tracker, id)?, true, format)
}

/// Execute start command
///
/// # Errors
///
/// Returns an error if the id is blank or output formatting fails.
pub fn start(tracker: &mut Tracker, id: &str, format: OutputFormat) -> Result<String, TrackerError> {
    let changed = tracker.start_or_create(id)?;
    format_action("Started", &view(tracker, id)?, changed, format)
}

/// Execute pause command; without an id the running timer is paused.
///
/// # Errors
///
/// Returns an error if the timer does not exist or output formatting fails.
pub fn pause(
    tracker: &mut Tracker,
    id: Option<&str>,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    let id = match id {
        Some(id) => id.to_string(),
        None => match tracker.manager().get_running_timer() {
            Some(timer) => timer.id().to_string(),
            None => return format_status(None, &tracker.status_line(), format),
        },
    };

    let changed = tracker.manager_mut().pause(&id)?;
    format_action("Paused", &view(tracker, &id)?, changed, format)
}

/// Execute pause-all command
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn pause_all(tracker: &mut Tracker, format: OutputFormat) -> Result<String, TrackerError> {
    let running = tracker
        .manager()
        .get_running_timer()
        .map(|t| t.id().to_string());
    tracker.manager_mut().pause_all();

    match running {
        Some(id) => format_action("Paused", &view(tracker, &id)?, true, format),
        None => format_status(None, &tracker.status_line(), format),
    }
}

/// Execute resume command
///
/// # Errors
///
/// Returns an error if the timer does not exist or output formatting fails.
pub fn resume(tracker: &mut Tracker, id: &str, format: OutputFormat) -> Result<String, TrackerError> {
    let changed = tracker.manager_mut().resume(id)?;
    format_action("Resumed", &view(tracker, id)?, changed, format)
}

/// Execute reset command
///
/// # Errors
///
/// Returns an error if the timer does not exist or output formatting fails.
pub fn reset(tracker: &mut Tracker, id: &str, format: OutputFormat) -> Result<String, TrackerError> {
    tracker.manager_mut().reset(id)?;
    format_action("Reset", &view(tracker, id)?, true, format)
}

/// Execute restart command
///
/// # Errors
///
/// Returns an error if the timer does not exist or output formatting fails.
pub fn restart(
    tracker: &mut Tracker,
    id: &str,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    tracker.manager_mut().restart(id)?;
    format_action("Restarted", &view(tracker, id)?, true, format)
}

/// Execute save command
///
/// # Errors
///
/// Returns an error if the timer does not exist or its sink fails.
pub fn save(tracker: &mut Tracker, id: &str, format: OutputFormat) -> Result<String, TrackerError> {
    let outcome = tracker.save_timer(id)?;
    format_saved(&outcome, format)
}

/// Execute edit command
///
/// # Errors
///
/// Returns an error if the duration cannot be parsed or the timer does not
/// exist.
pub fn edit(
    tracker: &mut Tracker,
    id: &str,
    duration: &str,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    let seconds = parse_hms(duration)?;
    tracker.manager_mut().force_duration(id, seconds)?;
    format_action("Edited", &view(tracker, id)?, true, format)
}

/// Execute delete command
///
/// # Errors
///
/// Returns an error if the timer does not exist or output formatting fails.
pub fn delete(tracker: &mut Tracker, id: &str, format: OutputFormat) -> Result<String, TrackerError> {
    let removed = tracker.manager_mut().delete_by_id(id)?;
    format_deleted(&[removed], format)
}

/// Execute delete-all command
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn delete_all(tracker: &mut Tracker, format: OutputFormat) -> Result<String, TrackerError> {
    let removed = tracker.manager_mut().delete_all();
    format_deleted(&removed, format)
}

/// Execute list command
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn list(tracker: &Tracker, format: OutputFormat) -> Result<String, TrackerError> {
    let now = tracker.manager().now();
    let timers: Vec<TimerView> = tracker
        .manager()
        .get_all()
        .iter()
        .map(|t| TimerView::of(t, now))
        .collect();
    format_timers(&timers, format)
}

/// Execute status command
///
/// # Errors
///
/// Returns an error if output formatting fails.
pub fn status(tracker: &Tracker, format: OutputFormat) -> Result<String, TrackerError> {
    let now = tracker.manager().now();
    let running = tracker
        .manager()
        .get_running_timer()
        .map(|t| TimerView::of(t, now));
    format_status(running.as_ref(), &tracker.status_line(), format)
}

/// Execute tag command
///
/// # Errors
///
/// Returns an error if the timer does not exist or output formatting fails.
pub fn tag(
    tracker: &mut Tracker,
    id: &str,
    action: TagAction,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match action {
        TagAction::Add { tag } => {
            tracker.add_tag(id, &tag)?;
            format_action("Tagged", &view(tracker, id)?, true, format)
        }
        TagAction::Remove { tag } => {
            let removed = tracker.remove_tag(id, &tag)?;
            format_action("Untagged", &view(tracker, id)?, removed, format)
        }
    }
}

/// Execute pomodoro command
///
/// # Errors
///
/// Returns an error if the id is blank or output formatting fails.
pub fn pomodoro(
    tracker: &mut Tracker,
    id: &str,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    tracker.pomodoro(id)?;
    let remaining = tracker.pomodoro_remaining(id)?;
    format_pomodoro(&view(tracker, id)?, remaining, format)
}
