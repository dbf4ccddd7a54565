//! Registry of timers, single-runner policy and event emission.

use std::fmt;

use chrono::{DateTime, Utc};

use super::events::{EventBus, EventKind, TimerEvent, TimerRef};
use super::snapshot::TimerRecord;
use super::timer::Timer;
use crate::core::{Clock, SystemClock};
use crate::error::TrackerError;

/// Owns every timer, keeps at most one running and publishes their changes.
pub struct TimerManager {
    timers: Vec<Timer>,
    bus: EventBus,
    clock: Box<dyn Clock>,
}

impl TimerManager {
    /// Create an empty manager on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Create an empty manager on a custom clock.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            timers: Vec::new(),
            bus: EventBus::new(),
            clock: Box::new(clock),
        }
    }

    /// Sample the manager's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// All timers in insertion order.
    #[must_use]
    pub fn get_all(&self) -> &[Timer] {
        &self.timers
    }

    /// Look up a timer.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    /// The running timer, if any.
    #[must_use]
    pub fn get_running_timer(&self) -> Option<&Timer> {
        self.timers.iter().find(|t| t.is_running)
    }

    /// Number of registered timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Check if no timer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Register a new, not yet started timer.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DuplicateIdentifier` if `id` is taken.
    pub fn create_new(&mut self, id: &str) -> Result<&Timer, TrackerError> {
        if self.get_by_id(id).is_some() {
            return Err(TrackerError::DuplicateIdentifier(id.to_string()));
        }
        tracing::debug!(timer = id, "timer created");
        self.timers.push(Timer::new(id));
        let index = self.timers.len() - 1;
        Ok(&self.timers[index])
    }

    /// Subscribe to an event kind.
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&TimerEvent) -> anyhow::Result<()> + 'static,
    {
        self.bus.on(kind, callback);
    }

    /// Publish an event to subscribers. Returns how many succeeded.
    pub fn emit(&mut self, event: &TimerEvent) -> usize {
        self.bus.emit(event)
    }

    /// Pause every running timer.
    pub fn pause_all(&mut self) {
        let now = self.now();
        self.pause_others(None, now);
    }

    /// Start a timer, or resume it if it was started before.
    ///
    /// Every other timer is paused first. Returns false when the timer was
    /// already running.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn start(&mut self, id: &str) -> Result<bool, TrackerError> {
        let now = self.now();
        let index = self.activate(id, now)?;
        let kind = self.timers[index].start(now);
        Ok(self.publish(index, kind, now))
    }

    /// Resume a paused timer, pausing every other timer first.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn resume(&mut self, id: &str) -> Result<bool, TrackerError> {
        let now = self.now();
        let index = self.activate(id, now)?;
        let kind = self.timers[index].resume(now);
        Ok(self.publish(index, kind, now))
    }

    /// Pause a timer. Returns false if it was not running.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn pause(&mut self, id: &str) -> Result<bool, TrackerError> {
        let now = self.now();
        let index = self.index_of(id)?;
        let kind = self.timers[index].pause(now);
        Ok(self.publish(index, kind, now))
    }

    /// Return a timer to its never-started state.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn reset(&mut self, id: &str) -> Result<(), TrackerError> {
        let now = self.now();
        let index = self.index_of(id)?;
        let kind = self.timers[index].reset();
        self.publish(index, Some(kind), now);
        Ok(())
    }

    /// Reset a timer and start it again.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn restart(&mut self, id: &str) -> Result<(), TrackerError> {
        self.reset(id)?;
        self.start(id)?;
        Ok(())
    }

    /// Pause a timer and announce it as saved.
    ///
    /// The timer stays registered; disposal is up to the subscribers and
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn save(&mut self, id: &str) -> Result<TimerEvent, TrackerError> {
        let now = self.now();
        let index = self.index_of(id)?;
        let kind = self.timers[index].pause(now);
        self.publish(index, kind, now);

        let event = self.event_for(index, EventKind::Saved, now);
        self.bus.emit(&event);
        Ok(event)
    }

    /// Set a timer's duration by hand, pausing it if needed.
    ///
    /// The duration stays at `seconds` until the timer is resumed.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn force_duration(&mut self, id: &str, seconds: u64) -> Result<(), TrackerError> {
        let now = self.now();
        let index = self.index_of(id)?;
        let paused = self.timers[index].force_duration(now, seconds);
        self.publish(index, paused, now);
        self.publish(index, Some(EventKind::Edited), now);
        Ok(())
    }

    /// Add a tag to a timer.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn add_tag(&mut self, id: &str, tag: &str) -> Result<(), TrackerError> {
        let index = self.index_of(id)?;
        self.timers[index].add_tag(tag);
        Ok(())
    }

    /// Remove a tag from a timer. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn remove_tag(&mut self, id: &str, tag: &str) -> Result<bool, TrackerError> {
        let index = self.index_of(id)?;
        Ok(self.timers[index].remove_tag(tag))
    }

    /// Elapsed seconds of a timer right now.
    #[must_use]
    pub fn duration_of(&self, id: &str) -> Option<u64> {
        let now = self.now();
        self.get_by_id(id).map(|t| t.duration_at(now))
    }

    /// Elapsed seconds of a timer rounded to `bucket`.
    #[must_use]
    pub fn approximated_duration_of(&self, id: &str, bucket: u64) -> Option<u64> {
        let now = self.now();
        self.get_by_id(id)
            .map(|t| t.approximated_duration_at(now, bucket))
    }

    /// Remove a timer and announce its deletion.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn delete_by_id(&mut self, id: &str) -> Result<TimerRef, TrackerError> {
        let index = self.index_of(id)?;
        let removed = self.timers.remove(index).to_ref();
        tracing::debug!(timer = id, "timer deleted");
        self.bus.emit(&TimerEvent::deleted(removed.clone()));
        Ok(removed)
    }

    /// Remove every timer, announcing one deletion per timer.
    pub fn delete_all(&mut self) -> Vec<TimerRef> {
        let removed: Vec<TimerRef> = std::mem::take(&mut self.timers)
            .iter()
            .map(Timer::to_ref)
            .collect();
        for timer in &removed {
            self.bus.emit(&TimerEvent::deleted(timer.clone()));
        }
        removed
    }

    /// Plain-data copy of every timer.
    #[must_use]
    pub fn dump(&self) -> Vec<TimerRecord> {
        self.timers.iter().map(TimerRecord::from).collect()
    }

    /// Replace the registry with timers rebuilt from `records`.
    ///
    /// An empty or entirely unusable snapshot leaves the registry as it is.
    /// Records without an id are skipped, a repeated id keeps its first
    /// record, and only the first record claiming to run keeps running.
    /// Returns the number of timers restored.
    pub fn restore(&mut self, records: Vec<TimerRecord>) -> usize {
        let now = self.now();
        let mut imported: Vec<Timer> = Vec::with_capacity(records.len());

        for record in records {
            let Some(mut timer) = record.into_timer() else {
                tracing::warn!("skipping stored timer without an identifier");
                continue;
            };
            if imported.iter().any(|t| t.id == timer.id) {
                tracing::warn!(timer = %timer.id, "skipping duplicated stored timer");
                continue;
            }
            if timer.is_running && imported.iter().any(|t| t.is_running) {
                tracing::warn!(timer = %timer.id, "pausing extra running timer from storage");
                timer.pause(now);
            }
            imported.push(timer);
        }

        if imported.is_empty() {
            return 0;
        }

        tracing::debug!(count = imported.len(), "timers restored");
        self.timers = imported;
        self.timers.len()
    }

    /// Pause every timer except `id`, then return its index.
    ///
    /// This is the only place that enforces the single-runner rule.
    fn activate(&mut self, id: &str, now: DateTime<Utc>) -> Result<usize, TrackerError> {
        let index = self.index_of(id)?;
        self.pause_others(Some(index), now);
        Ok(index)
    }

    fn pause_others(&mut self, keep: Option<usize>, now: DateTime<Utc>) {
        for index in 0..self.timers.len() {
            if Some(index) == keep {
                continue;
            }
            let kind = self.timers[index].pause(now);
            self.publish(index, kind, now);
        }
    }

    fn index_of(&self, id: &str) -> Result<usize, TrackerError> {
        self.timers
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TrackerError::IdentifierNotFound(id.to_string()))
    }

    fn event_for(&self, index: usize, kind: EventKind, now: DateTime<Utc>) -> TimerEvent {
        let timer = &self.timers[index];
        TimerEvent {
            kind,
            timer: timer.to_ref(),
            duration: Some(timer.duration_at(now)),
            is_running: timer.is_running,
        }
    }

    /// Emit `kind` for the timer at `index`; returns whether anything happened.
    fn publish(&mut self, index: usize, kind: Option<EventKind>, now: DateTime<Utc>) -> bool {
        let Some(kind) = kind else {
            return false;
        };
        let event = self.event_for(index, kind, now);
        tracing::debug!(timer = %event.timer.id, event = %kind, duration = ?event.duration, "timer event");
        self.bus.emit(&event);
        true
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerManager")
            .field("timers", &self.timers)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}
