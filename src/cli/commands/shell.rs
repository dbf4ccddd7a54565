//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::TrackerError;

/// Generate the completion script for a shell.
///
/// # Errors
///
/// Returns `TrackerError::InvalidInput` if the generated script is not UTF-8.
pub fn completions(shell: Shell) -> Result<String, TrackerError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "timetrack", &mut buf);
    String::from_utf8(buf).map_err(|e| TrackerError::InvalidInput(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let script = completions(Shell::Bash).unwrap();
        assert!(script.contains("timetrack"));
        assert!(script.contains("pomodoro"));
    }

    #[test]
    fn test_fish_completions() {
        let script = completions(Shell::Fish).unwrap();
        assert!(script.contains("complete -c timetrack"));
    }
}
