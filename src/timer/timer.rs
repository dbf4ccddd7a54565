//! A single pausable stopwatch.
//!
//! A timer never ticks. It keeps a few timestamps plus an accumulator and
//! rebuilds its elapsed duration from them whenever asked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::duration::{approximate, format_hms, DurationParts};
use super::events::{EventKind, TimerRef};
use crate::core::elapsed_seconds;

/// Where the reported duration comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationSource {
    /// Reconstructed from timestamps and the accumulator.
    #[default]
    Computed,
    /// Set by hand; frozen at the accumulator until the next resume.
    Overridden,
}

/// Lifecycle state derived from the timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    /// Never started (or reset)
    NeverStarted,
    /// Currently accumulating time
    Running,
    /// Started at least once, not running now
    Paused,
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NeverStarted => write!(f, "Not started"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// A named stopwatch.
///
/// Lifecycle changes go through [`TimerManager`](super::TimerManager), which
/// samples the clock and keeps at most one timer running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub(crate) id: String,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) paused_at: Option<DateTime<Utc>>,
    pub(crate) resumed_at: Option<DateTime<Utc>>,
    pub(crate) duration_acc: u64,
    pub(crate) is_running: bool,
    pub(crate) tags: Vec<String>,
    pub(crate) source: DurationSource,
}

impl Timer {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            started_at: None,
            paused_at: None,
            resumed_at: None,
            duration_acc: 0,
            is_running: false,
            tags: Vec::new(),
            source: DurationSource::Computed,
        }
    }

    /// Identifier, unique within its manager.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the timer was first started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the timer was last paused.
    #[must_use]
    pub const fn paused_at(&self) -> Option<DateTime<Utc>> {
        self.paused_at
    }

    /// When the timer was last resumed.
    #[must_use]
    pub const fn resumed_at(&self) -> Option<DateTime<Utc>> {
        self.resumed_at
    }

    /// Seconds folded in from closed run segments.
    #[must_use]
    pub const fn duration_acc(&self) -> u64 {
        self.duration_acc
    }

    /// Check if the timer is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    /// Tags in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Where the duration currently comes from.
    #[must_use]
    pub const fn source(&self) -> DurationSource {
        self.source
    }

    /// Get the current state.
    #[must_use]
    pub const fn state(&self) -> TimerState {
        if self.started_at.is_none() {
            TimerState::NeverStarted
        } else if self.is_running {
            TimerState::Running
        } else {
            TimerState::Paused
        }
    }

    /// A detached reference carrying the id and a copy of the tags.
    #[must_use]
    pub fn to_ref(&self) -> TimerRef {
        TimerRef {
            id: self.id.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Elapsed seconds as of `now`.
    ///
    /// The accumulator is authoritative once non-zero; `now` only ever
    /// measures the segment that is still open.
    #[must_use]
    pub fn duration_at(&self, now: DateTime<Utc>) -> u64 {
        if self.source == DurationSource::Overridden {
            return self.duration_acc;
        }

        let Some(started_at) = self.started_at else {
            return 0;
        };

        match (self.paused_at, self.resumed_at) {
            // running, never paused
            (None, None) if self.is_running => elapsed_seconds(started_at, now),
            // paused once, never resumed
            (Some(paused_at), None) if !self.is_running => {
                elapsed_seconds(started_at, paused_at)
            }
            // resumed, first segment not folded yet
            (Some(paused_at), Some(resumed_at)) if self.is_running && self.duration_acc == 0 => {
                elapsed_seconds(started_at, paused_at)
                    .saturating_add(elapsed_seconds(resumed_at, now))
            }
            // paused again, accumulator folded
            (Some(_), Some(_)) if !self.is_running && self.duration_acc > 0 => self.duration_acc,
            // running again, accumulator folded
            (Some(_), Some(resumed_at)) if self.is_running && self.duration_acc > 0 => {
                self.duration_acc.saturating_add(elapsed_seconds(resumed_at, now))
            }
            _ => 0,
        }
    }

    /// Elapsed seconds rounded to the nearest `bucket` (see [`approximate`]).
    #[must_use]
    pub fn approximated_duration_at(&self, now: DateTime<Utc>, bucket: u64) -> u64 {
        approximate(self.duration_at(now), bucket)
    }

    /// Elapsed time as `HH:MM:SS`.
    #[must_use]
    pub fn formatted_duration_at(&self, now: DateTime<Utc>) -> String {
        format_hms(self.duration_at(now))
    }

    /// Elapsed time split for editing.
    #[must_use]
    pub fn duration_parts_at(&self, now: DateTime<Utc>) -> DurationParts {
        DurationParts::from_seconds(self.duration_at(now))
    }

    /// Add a tag. Duplicates are kept.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.push(tag.into());
    }

    /// Remove the first occurrence of a tag.
    ///
    /// Returns true if the tag was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        match self.tags.iter().position(|t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check whether the timer carries a tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// First start, or a resume when the timer has already been started.
    pub(crate) fn start(&mut self, now: DateTime<Utc>) -> Option<EventKind> {
        if self.started_at.is_some() {
            return self.resume(now);
        }
        self.started_at = Some(now);
        self.is_running = true;
        Some(EventKind::Started)
    }

    pub(crate) fn pause(&mut self, now: DateTime<Utc>) -> Option<EventKind> {
        if !self.is_running {
            return None;
        }
        let folded_empty = self.paused_at.is_some() && {
            self.fold(now);
            self.duration_acc == 0
        };
        self.paused_at = Some(now);
        if folded_empty {
            // a zero accumulator reads as unfolded; collapse the segment instead
            self.started_at = Some(now);
        }
        self.is_running = false;
        Some(EventKind::Paused)
    }

    /// Resume after a pause, or a first start when the timer never ran.
    pub(crate) fn resume(&mut self, now: DateTime<Utc>) -> Option<EventKind> {
        if self.is_running {
            return None;
        }
        if self.started_at.is_none() {
            return self.start(now);
        }
        if self.resumed_at.is_some() {
            self.fold(now);
        }
        self.source = DurationSource::Computed;
        self.resumed_at = Some(now);
        self.is_running = true;
        Some(EventKind::Resumed)
    }

    pub(crate) fn reset(&mut self) -> EventKind {
        self.started_at = None;
        self.paused_at = None;
        self.resumed_at = None;
        self.duration_acc = 0;
        self.is_running = false;
        self.source = DurationSource::Computed;
        EventKind::Reset
    }

    /// Freeze the duration at `seconds` until the next resume.
    ///
    /// Returns the pause event when the timer had to be stopped first.
    pub(crate) fn force_duration(&mut self, now: DateTime<Utc>, seconds: u64) -> Option<EventKind> {
        let paused = self.pause(now);

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        let paused_at = *self.paused_at.get_or_insert(now);
        if seconds == 0 {
            // nothing before the next resume may count
            self.started_at = Some(paused_at);
        }
        self.duration_acc = seconds;
        self.resumed_at = Some(paused_at);
        self.source = DurationSource::Overridden;

        paused
    }

    fn fold(&mut self, now: DateTime<Utc>) {
        self.duration_acc = self.duration_at(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(seconds)
    }

    #[test]
    fn test_never_started_is_zero() {
        let timer = Timer::new("a");
        assert_eq!(timer.duration_at(at(100)), 0);
        assert_eq!(timer.state(), TimerState::NeverStarted);
    }

    #[test]
    fn test_running_never_paused() {
        let mut timer = Timer::new("a");
        assert_eq!(timer.start(at(0)), Some(EventKind::Started));
        assert_eq!(timer.duration_at(at(42)), 42);
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn test_paused_never_resumed() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        assert_eq!(timer.pause(at(30)), Some(EventKind::Paused));
        assert_eq!(timer.duration_at(at(500)), 30);
        assert_eq!(timer.duration_acc(), 0);
    }

    #[test]
    fn test_first_resume_before_fold() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        timer.pause(at(30));
        assert_eq!(timer.resume(at(100)), Some(EventKind::Resumed));
        assert_eq!(timer.duration_acc(), 0);
        assert_eq!(timer.duration_at(at(110)), 40);
    }

    #[test]
    fn test_second_pause_folds_accumulator() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        timer.pause(at(30));
        timer.resume(at(100));
        timer.pause(at(120));
        assert_eq!(timer.duration_acc(), 50);
        assert_eq!(timer.duration_at(at(9_999)), 50);
    }

    #[test]
    fn test_running_after_fold() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        timer.pause(at(30));
        timer.resume(at(100));
        timer.pause(at(120));
        timer.resume(at(200));
        // second resume folds again; accumulator stays 50
        assert_eq!(timer.duration_acc(), 50);
        assert_eq!(timer.duration_at(at(210)), 60);
        timer.pause(at(215));
        assert_eq!(timer.duration_at(at(300)), 65);
    }

    #[test]
    fn test_many_cycles_match_wall_clock_segments() {
        let mut timer = Timer::new("a");
        let segments = [(0, 10), (20, 25), (40, 100), (130, 131), (200, 260)];
        let mut expected = 0;
        for (begin, end) in segments {
            timer.start(at(begin));
            timer.pause(at(end));
            expected += u64::try_from(end - begin).unwrap();
            assert_eq!(timer.duration_at(at(end)), expected);
        }
    }

    #[test]
    fn test_sub_second_timestamps_truncate() {
        let mut timer = Timer::new("a");
        timer.start(t0() + Duration::milliseconds(900));
        assert_eq!(timer.duration_at(t0() + Duration::milliseconds(2_100)), 2);
    }

    #[test]
    fn test_pause_when_not_running_is_noop() {
        let mut timer = Timer::new("a");
        assert_eq!(timer.pause(at(5)), None);
        timer.start(at(0));
        timer.pause(at(10));
        let before = timer.clone();
        assert_eq!(timer.pause(at(20)), None);
        assert_eq!(timer, before);
    }

    #[test]
    fn test_resume_when_running_is_noop() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        let before = timer.clone();
        assert_eq!(timer.resume(at(10)), None);
        assert_eq!(timer.start(at(10)), None);
        assert_eq!(timer, before);
    }

    #[test]
    fn test_resume_of_never_started_is_a_start() {
        let mut timer = Timer::new("a");
        assert_eq!(timer.resume(at(10)), Some(EventKind::Started));
        assert_eq!(timer.state(), TimerState::Running);
        assert_eq!(timer.started_at(), Some(at(10)));
        assert!(timer.resumed_at().is_none());
        assert_eq!(timer.duration_at(at(40)), 30);
    }

    #[test]
    fn test_reset_returns_to_never_started() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        timer.pause(at(10));
        timer.resume(at(20));
        assert_eq!(timer.reset(), EventKind::Reset);
        assert_eq!(timer.duration_at(at(100)), 0);
        assert_eq!(timer.state(), TimerState::NeverStarted);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_force_duration_freezes_until_resume() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        assert_eq!(timer.force_duration(at(50), 600), Some(EventKind::Paused));
        assert!(!timer.is_running());
        assert_eq!(timer.source(), DurationSource::Overridden);
        assert_eq!(timer.duration_at(at(5_000)), 600);

        timer.resume(at(5_000));
        assert_eq!(timer.source(), DurationSource::Computed);
        assert_eq!(timer.duration_at(at(5_010)), 610);
    }

    #[test]
    fn test_huge_accumulator_saturates() {
        let mut timer = Timer::new("a");
        timer.force_duration(at(0), u64::MAX);
        timer.resume(at(0));
        assert_eq!(timer.duration_at(at(1)), u64::MAX);

        timer.pause(at(5));
        assert_eq!(timer.duration_at(at(5)), u64::MAX);
    }

    #[test]
    fn test_force_duration_on_fresh_timer() {
        let mut timer = Timer::new("a");
        assert_eq!(timer.force_duration(at(0), 90), None);
        assert_eq!(timer.duration_at(at(1_000)), 90);
        assert_eq!(timer.state(), TimerState::Paused);
    }

    #[test]
    fn test_force_zero_does_not_resurrect_old_segment() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        timer.pause(at(100));
        timer.force_duration(at(150), 0);
        assert_eq!(timer.duration_at(at(200)), 0);

        timer.resume(at(300));
        assert_eq!(timer.duration_at(at(305)), 5);
    }

    #[test]
    fn test_zero_length_segments_do_not_count_gaps() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        timer.pause(at(0));
        timer.resume(at(100));
        timer.pause(at(100));
        timer.resume(at(200));
        assert_eq!(timer.duration_at(at(203)), 3);
    }

    #[test]
    fn test_formatting_helpers() {
        let mut timer = Timer::new("a");
        timer.start(at(0));
        assert_eq!(timer.formatted_duration_at(at(3661)), "01:01:01");
        let parts = timer.duration_parts_at(at(3661));
        assert_eq!((parts.hours, parts.minutes, parts.seconds), (1, 1, 1));
        assert_eq!(timer.approximated_duration_at(at(360), 600), 600);
    }

    #[test]
    fn test_tags() {
        let mut timer = Timer::new("a");
        timer.add_tag("pomodoro");
        timer.add_tag("jira");
        timer.add_tag("jira");
        assert!(timer.has_tag("jira"));
        assert!(timer.remove_tag("jira"));
        assert!(timer.has_tag("jira"));
        assert!(timer.remove_tag("jira"));
        assert!(!timer.has_tag("jira"));
        assert!(!timer.remove_tag("missing"));
        assert_eq!(timer.tags(), ["pomodoro".to_string()]);
    }
}
