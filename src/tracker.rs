//! The tracker ties the timer core to configuration and storage.
//!
//! It restores the stored snapshot on open, marks itself dirty whenever the
//! manager publishes a change, and writes the snapshot back on `commit`.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::{Config, Paths};
use crate::core::Clock;
use crate::error::TrackerError;
use crate::routing::{Disposal, JournalSink, OutboxSink, Routed, SaveRouter, SavedEntry};
use crate::storage::{Journal, Outbox, StateStore};
use crate::timer::{format_hms, EventKind, Timer, TimerManager};

/// Label shown when nothing runs.
pub const NO_TIMER_RUNNING: &str = "no running timer";

/// Tag marking recurring pomodoro timers.
pub const POMODORO_TAG: &str = "pomodoro";

/// Outcome of saving a timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub entry: SavedEntry,
    pub routed: Routed,
}

/// A timer manager bound to a data directory.
pub struct Tracker {
    config: Config,
    manager: TimerManager,
    store: StateStore,
    router: SaveRouter,
    dirty: Rc<Cell<bool>>,
}

impl Tracker {
    /// Open the tracker for a data directory on the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// stored snapshot cannot be read.
    pub fn open(paths: &Paths, config: Config) -> Result<Self, TrackerError> {
        Self::open_with_manager(paths, config, TimerManager::new())
    }

    /// Open the tracker with a custom clock.
    ///
    /// # Errors
    ///
    /// See [`Tracker::open`].
    pub fn open_with_clock(
        paths: &Paths,
        config: Config,
        clock: impl Clock + 'static,
    ) -> Result<Self, TrackerError> {
        Self::open_with_manager(paths, config, TimerManager::with_clock(clock))
    }

    fn open_with_manager(
        paths: &Paths,
        config: Config,
        mut manager: TimerManager,
    ) -> Result<Self, TrackerError> {
        paths.ensure_dirs()?;

        let store = StateStore::new(paths.state_file.clone());
        let restored = manager.restore(store.load()?);
        tracing::debug!(restored, path = %store.path().display(), "tracker opened");

        let dirty = Rc::new(Cell::new(false));
        for kind in EventKind::ALL {
            let dirty = Rc::clone(&dirty);
            manager.on(kind, move |event| {
                tracing::info!(timer = %event.timer.id, event = %event.kind, "timer changed");
                dirty.set(true);
                Ok(())
            });
        }

        let router = SaveRouter::new(
            &config.routing,
            Box::new(OutboxSink::new(Outbox::new(paths.outbox_file.clone()))),
            Box::new(JournalSink::new(Journal::new(
                paths.journal_file(&config.tracking.storage_file),
            ))),
        );

        Ok(Self {
            config,
            manager,
            store,
            router,
            dirty,
        })
    }

    /// Loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying manager.
    #[must_use]
    pub const fn manager(&self) -> &TimerManager {
        &self.manager
    }

    /// Mutable access to the underlying manager.
    pub fn manager_mut(&mut self) -> &mut TimerManager {
        &mut self.manager
    }

    /// Look up a timer, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn timer(&self, id: &str) -> Result<&Timer, TrackerError> {
        self.manager
            .get_by_id(id)
            .ok_or_else(|| TrackerError::IdentifierNotFound(id.to_string()))
    }

    /// Create a timer with tags, optionally starting it.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DuplicateIdentifier` if the id is taken, or
    /// `TrackerError::InvalidInput` for a blank id.
    pub fn create(&mut self, id: &str, tags: &[String], start: bool) -> Result<(), TrackerError> {
        if id.trim().is_empty() {
            return Err(TrackerError::InvalidInput(
                "timer identifier cannot be empty".to_string(),
            ));
        }

        self.manager.create_new(id)?;
        for tag in tags {
            self.manager.add_tag(id, tag)?;
        }
        self.dirty.set(true);

        if start {
            self.manager.start(id)?;
        }
        Ok(())
    }

    /// Start a timer, creating it first when it does not exist.
    ///
    /// Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidInput` for a blank id.
    pub fn start_or_create(&mut self, id: &str) -> Result<bool, TrackerError> {
        if self.manager.get_by_id(id).is_none() {
            self.create(id, &[], true)?;
            return Ok(true);
        }
        self.manager.start(id)
    }

    /// Start a pomodoro timer, tagging it on first use.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidInput` for a blank id.
    pub fn pomodoro(&mut self, id: &str) -> Result<bool, TrackerError> {
        if self.manager.get_by_id(id).is_none() {
            self.create(id, &[POMODORO_TAG.to_string()], true)?;
            return Ok(true);
        }
        if !self.timer(id)?.has_tag(POMODORO_TAG) {
            self.manager.add_tag(id, POMODORO_TAG)?;
            self.dirty.set(true);
        }
        self.manager.start(id)
    }

    /// Seconds left in the current pomodoro of a timer (0 when over).
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn pomodoro_remaining(&self, id: &str) -> Result<u64, TrackerError> {
        let elapsed = self.timer(id)?.duration_at(self.manager.now());
        Ok(self
            .config
            .tracking
            .pomodoro_duration_seconds
            .saturating_sub(elapsed))
    }

    /// Save a timer: pause it, hand it to its sink, then delete it unless a
    /// keep tag applies.
    ///
    /// If the sink fails the timer stays registered and paused.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id, or the
    /// sink's error.
    pub fn save_timer(&mut self, id: &str) -> Result<SaveOutcome, TrackerError> {
        let event = self.manager.save(id)?;
        let timer = self.timer(id)?;
        let saved_at = self.manager.now();

        let entry = SavedEntry {
            id: timer.id().to_string(),
            duration: timer
                .approximated_duration_at(saved_at, self.config.tracking.approximation_seconds),
            started_at: timer.started_at(),
            tags: event.timer.tags,
            saved_at,
        };

        let routed = self.router.route(&entry)?;
        if routed.disposal == Disposal::Delete {
            self.manager.delete_by_id(id)?;
        }

        Ok(SaveOutcome { entry, routed })
    }

    /// Add a tag to a timer.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn add_tag(&mut self, id: &str, tag: &str) -> Result<(), TrackerError> {
        self.manager.add_tag(id, tag)?;
        self.dirty.set(true);
        Ok(())
    }

    /// Remove a tag from a timer. Returns whether it was present.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::IdentifierNotFound` for an unknown id.
    pub fn remove_tag(&mut self, id: &str, tag: &str) -> Result<bool, TrackerError> {
        let removed = self.manager.remove_tag(id, tag)?;
        if removed {
            self.dirty.set(true);
        }
        Ok(removed)
    }

    /// One-line summary of the running timer.
    #[must_use]
    pub fn status_line(&self) -> String {
        let now = self.manager.now();
        self.manager
            .get_running_timer()
            .map_or_else(
                || NO_TIMER_RUNNING.to_string(),
                |timer| format!("{} {}", timer.id(), format_hms(timer.duration_at(now))),
            )
    }

    /// Check whether unsaved changes exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Write the snapshot if anything changed since opening.
    ///
    /// Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn commit(&mut self) -> Result<bool, TrackerError> {
        if !self.dirty.get() {
            return Ok(false);
        }
        self.store.save(self.manager.dump())?;
        self.dirty.set(false);
        Ok(true)
    }
}
