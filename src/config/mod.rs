//! Configuration management for timetrack.
//!
//! This module handles loading and saving configuration from `~/.timetrack/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, GeneralConfig, RoutingConfig, TrackingConfig};
