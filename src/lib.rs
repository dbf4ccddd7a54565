//! timetrack - pausable named stopwatches
//!
//! This crate keeps a registry of named timers of which at most one runs at
//! a time, rounds their durations for reporting, and routes saved timers to
//! a markdown journal or an outbox for external trackers.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod routing;
pub mod storage;
pub mod timer;
pub mod tracker;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TrackerError;
pub use timer::{Timer, TimerManager};
pub use tracker::Tracker;
