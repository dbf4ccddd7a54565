use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use timetrack::cli::args::{Cli, Commands, OutputFormat};
use timetrack::cli::commands;
use timetrack::config::{ColorSetting, Config, Paths};
use timetrack::error::TrackerError;
use timetrack::tracker::Tracker;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        if e.is_identifier_error() {
            eprintln!("{}", "run 'timetrack list' to see existing timers".dimmed());
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run() -> Result<(), TrackerError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        print!("{}", commands::completions(shell)?);
        return Ok(());
    }

    let paths = match cli.data_dir {
        Some(root) => Paths::with_root(root),
        None => Paths::new()?,
    };
    let config = Config::load(&paths)?;

    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    let format = cli.output.unwrap_or(config.general.default_output);
    let show_status = format == OutputFormat::Pretty
        && config.tracking.status_line
        && !matches!(cli.command, Commands::List | Commands::Status);

    let mut tracker = Tracker::open(&paths, config)?;

    // Persist whatever changed even when the command itself failed.
    let result = dispatch(&mut tracker, cli.command, format);
    tracker.commit()?;
    let output = result?;

    if !output.is_empty() {
        println!("{output}");
    }
    if show_status {
        println!("{}", tracker.status_line().dimmed());
    }

    Ok(())
}

fn dispatch(
    tracker: &mut Tracker,
    command: Commands,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match command {
        Commands::New { id, tag, no_start } => commands::new(tracker, &id, &tag, no_start, format),
        Commands::Start { id } => commands::start(tracker, &id, format),
        Commands::Pause { id } => commands::pause(tracker, id.as_deref(), format),
        Commands::PauseAll => commands::pause_all(tracker, format),
        Commands::Resume { id } => commands::resume(tracker, &id, format),
        Commands::Reset { id } => commands::reset(tracker, &id, format),
        Commands::Restart { id } => commands::restart(tracker, &id, format),
        Commands::Save { id } => commands::save(tracker, &id, format),
        Commands::Edit { id, duration } => commands::edit(tracker, &id, &duration, format),
        Commands::Delete { id } => commands::delete(tracker, &id, format),
        Commands::DeleteAll => commands::delete_all(tracker, format),
        Commands::List => commands::list(tracker, format),
        Commands::Status => commands::status(tracker, format),
        Commands::Tag { id, action } => commands::tag(tracker, &id, action, format),
        Commands::Pomodoro { id } => commands::pomodoro(tracker, &id, format),
        Commands::Completions { shell } => commands::completions(shell),
    }
}
