//! Core abstractions for timetrack.
//!
//! This module provides the time source shared by the timer core.

mod clock;

pub use clock::{elapsed_seconds, Clock, ManualClock, SystemClock};
