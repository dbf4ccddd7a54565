//! Storage layer for timetrack.
//!
//! This module provides file-based persistence for:
//! - The timer snapshot (`timers.json`)
//! - The markdown journal of saved timers
//! - The outbox of timers handed to external trackers

mod journal;
mod outbox;
mod state;

pub use journal::Journal;
pub use outbox::{Outbox, OutboxEntry};
pub use state::{StateStore, StoredState};
