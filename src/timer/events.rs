//! Timer events and the synchronous event bus.
//!
//! Subscribers are plain callbacks invoked in subscription order on the
//! emitting call. They receive a detached [`TimerEvent`], never the timer
//! itself, so a subscriber cannot reach back into the manager.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Kinds of timer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// First start of a timer
    #[serde(rename = "timer-start")]
    Started,
    #[serde(rename = "timer-paused")]
    Paused,
    #[serde(rename = "timer-resumed")]
    Resumed,
    #[serde(rename = "timer-reset")]
    Reset,
    /// Paused and handed over for disposal
    #[serde(rename = "timer-saved")]
    Saved,
    /// Duration set by hand
    #[serde(rename = "timer-edited")]
    Edited,
    /// Removed from the registry
    #[serde(rename = "timer-deleted")]
    Deleted,
}

impl EventKind {
    /// Every event kind.
    pub const ALL: [Self; 7] = [
        Self::Started,
        Self::Paused,
        Self::Resumed,
        Self::Reset,
        Self::Saved,
        Self::Edited,
        Self::Deleted,
    ];

    /// Canonical event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Started => "timer-start",
            Self::Paused => "timer-paused",
            Self::Resumed => "timer-resumed",
            Self::Reset => "timer-reset",
            Self::Saved => "timer-saved",
            Self::Edited => "timer-edited",
            Self::Deleted => "timer-deleted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TrackerError::InvalidInput(format!("unknown event '{s}'")))
    }
}

/// A reference to a timer that does not borrow it.
///
/// Deletion events carry only this, since the timer is already gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRef {
    pub id: String,
    /// Tags at the time the reference was taken
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TimerRef {
    /// Check whether the referenced timer carried a tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A timer event as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEvent {
    pub kind: EventKind,
    pub timer: TimerRef,
    /// Elapsed seconds at emission; `None` once the timer is deleted
    pub duration: Option<u64>,
    pub is_running: bool,
}

impl TimerEvent {
    /// An event for a timer that no longer exists.
    #[must_use]
    pub const fn deleted(timer: TimerRef) -> Self {
        Self {
            kind: EventKind::Deleted,
            timer,
            duration: None,
            is_running: false,
        }
    }
}

/// A subscriber callback.
pub type Callback = Box<dyn FnMut(&TimerEvent) -> anyhow::Result<()>>;

/// Synchronous in-process publish/subscribe.
#[derive(Default)]
pub struct EventBus {
    subscriptions: HashMap<EventKind, Vec<Callback>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a callback to one event kind.
    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&TimerEvent) -> anyhow::Result<()> + 'static,
    {
        self.subscriptions
            .entry(kind)
            .or_default()
            .push(Box::new(callback));
    }

    /// Deliver an event to its subscribers.
    ///
    /// A failing callback is logged and skipped; the rest still run.
    /// Returns the number of callbacks that succeeded.
    pub fn emit(&mut self, event: &TimerEvent) -> usize {
        let Some(callbacks) = self.subscriptions.get_mut(&event.kind) else {
            return 0;
        };

        let mut delivered = 0;
        for (index, callback) in callbacks.iter_mut().enumerate() {
            match callback(event) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    event = %event.kind,
                    timer = %event.timer.id,
                    subscriber = index,
                    "event subscriber failed: {e:#}"
                ),
            }
        }
        delivered
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .subscriptions
            .iter()
            .map(|(kind, callbacks)| (kind.name(), callbacks.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscriptions", &counts)
            .finish()
    }
}
