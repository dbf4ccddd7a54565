use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::config::HOME_ENV;

#[derive(Parser)]
#[command(name = "timetrack")]
#[command(about = "Pausable named stopwatches with rounding and tag-routed saving")]
#[command(long_about = "timetrack - pausable named stopwatches

Keeps a set of named timers of which at most one runs at a time. Starting
a timer pauses the one that was running. Saving a timer writes its
(optionally rounded) duration to a markdown journal, or to an outbox for
external trackers when it carries a routing tag.

QUICK START:
  timetrack start write-docs        Start (or create) a timer
  timetrack status                  Show the running timer
  timetrack save write-docs         Log it and remove it
  timetrack list                    Show all timers

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

Timers are stored under ~/.timetrack (override with --data-dir or TIMETRACK_HOME).")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output, or 'json' for
    /// machine-readable output. Defaults to the configured format.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Directory holding configuration, timers and the journal
    #[arg(long, global = true, env = HOME_ENV, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log timer activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new timer
    ///
    /// The timer starts right away unless --no-start is given. Starting it
    /// pauses whichever timer was running.
    ///
    /// # Examples
    ///
    ///   timetrack new write-docs
    ///   timetrack new PROJ-42 --tag jira
    ///   timetrack new later --no-start
    #[command(alias = "n")]
    New {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,

        /// Tag to attach (repeatable)
        #[arg(long, short = 't')]
        tag: Vec<String>,

        /// Create the timer paused
        #[arg(long)]
        no_start: bool,
    },

    /// Start a timer, creating it when missing
    #[command(alias = "s")]
    Start {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,
    },

    /// Pause a timer (the running one when no id is given)
    #[command(alias = "p")]
    Pause {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: Option<String>,
    },

    /// Pause every running timer
    PauseAll,

    /// Resume a paused timer
    #[command(alias = "r")]
    Resume {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,
    },

    /// Clear a timer back to zero without deleting it
    Reset {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,
    },

    /// Reset a timer and start it again
    Restart {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,
    },

    /// Log a timer to its destination
    ///
    /// Timers tagged with a routing tag (jira, redmine by default) go to the
    /// outbox; others are appended to the journal. The timer is removed
    /// afterwards unless it carries a keep tag (pomodoro by default).
    Save {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,
    },

    /// Set a timer's elapsed time
    ///
    /// Accepts HH:MM:SS, MM:SS or plain seconds. A running timer keeps
    /// running from the new value.
    ///
    /// # Examples
    ///
    ///   timetrack edit write-docs 01:30:00
    ///   timetrack edit write-docs 45:00
    Edit {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,

        /// New elapsed time
        duration: String,
    },

    /// Delete a timer without logging it
    #[command(alias = "rm")]
    Delete {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,
    },

    /// Delete every timer
    DeleteAll,

    /// List all timers
    #[command(alias = "ls")]
    List,

    /// Show the running timer
    Status,

    /// Add or remove a timer tag
    Tag {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,

        #[command(subcommand)]
        action: TagAction,
    },

    /// Start a pomodoro on a timer
    ///
    /// Creates the timer when missing and tags it so that saving keeps it
    /// around for the next round.
    Pomodoro {
        /// Timer identifier
        #[arg(value_parser = timer_id)]
        id: String,
    },

    /// Generate shell completions
    ///
    /// Example: timetrack completions bash > ~/.bash_completion.d/timetrack
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Timer identifiers are compared verbatim, so surrounding whitespace is
/// dropped once here for every subcommand.
fn timer_id(raw: &str) -> Result<String, String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err("timer identifier cannot be empty".to_string());
    }
    Ok(id.to_string())
}

/// Tag subcommands.
#[derive(Subcommand)]
pub enum TagAction {
    /// Attach a tag
    Add {
        /// Tag name
        tag: String,
    },
    /// Detach a tag
    Remove {
        /// Tag name
        tag: String,
    },
}
