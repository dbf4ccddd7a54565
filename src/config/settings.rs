//! Configuration settings for timetrack.
//!
//! Settings are loaded from `~/.timetrack/config.yaml`.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::TrackerError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Timer reporting settings.
    pub tracking: TrackingConfig,
    /// Save routing settings.
    pub routing: RoutingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Timer reporting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Bucket size in seconds for rounding saved durations (0 = exact).
    #[serde(default)]
    pub approximation_seconds: u64,
    /// Length of a pomodoro in seconds.
    #[serde(default = "default_pomodoro_duration")]
    pub pomodoro_duration_seconds: u64,
    /// Journal file name inside the data directory (`.md` added if missing).
    #[serde(default = "default_storage_file")]
    pub storage_file: String,
    /// Follow pretty command output with the running-timer line.
    #[serde(default = "default_true")]
    pub status_line: bool,
}

/// Where saved timers go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Timers with one of these tags stay registered after saving.
    #[serde(default = "default_keep_tags")]
    pub keep_tags: Vec<String>,
    /// Timers with one of these tags go to the outbox instead of the journal.
    #[serde(default = "default_external_tags")]
    pub external_tags: Vec<String>,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_pomodoro_duration() -> u64 {
    5 * 60
}

fn default_storage_file() -> String {
    "TimeTracker".to_string()
}

const fn default_true() -> bool {
    true
}

fn default_keep_tags() -> Vec<String> {
    vec!["pomodoro".to_string()]
}

fn default_external_tags() -> Vec<String> {
    vec!["jira".to_string(), "redmine".to_string()]
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            approximation_seconds: 0,
            pomodoro_duration_seconds: default_pomodoro_duration(),
            storage_file: default_storage_file(),
            status_line: default_true(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            keep_tags: default_keep_tags(),
            external_tags: default_external_tags(),
        }
    }
}

impl Config {
    /// Load configuration for a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load(paths: &Paths) -> Result<Self, TrackerError> {
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, TrackerError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }
}
