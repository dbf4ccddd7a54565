//! Pausable named timers.
//!
//! - `Timer` rebuilds its elapsed time from sparse timestamps
//! - `TimerManager` owns the timers and keeps at most one running
//! - `EventBus` tells subscribers about every state change
//! - `TimerRecord` is the plain-data form used for storage

pub mod duration;
pub mod events;
pub mod manager;
pub mod snapshot;
#[allow(clippy::module_inception)]
pub mod timer;

pub use duration::{approximate, format_hms, parse_hms, DurationParts};
pub use events::{Callback, EventBus, EventKind, TimerEvent, TimerRef};
pub use manager::TimerManager;
pub use snapshot::TimerRecord;
pub use timer::{DurationSource, Timer, TimerState};
