//! Command-line interface for timetrack.

pub mod args;
pub mod commands;
