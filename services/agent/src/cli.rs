//! Command-line interface for the agent worker.

use clap::{Parser, Subcommand};
use std::ffi::OsString;

/// Mode injected when the worker is started without one.
pub const DEFAULT_MODE: &str = "dev";

#[derive(Parser, Debug)]
#[command(name = "agent", version, about = "Ellie, a mental health support voice agent")]
pub struct Cli {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run the agent locally with verbose logging.
    Dev,
    /// Run the agent with the configured log level.
    Start,
    /// Serve the support tool over MCP on stdin/stdout.
    Tools,
}

impl Cli {
    /// Parses the process arguments, defaulting to `dev` when no mode is given.
    pub fn parse_with_default_mode() -> Self {
        Self::parse_from(with_default_mode(std::env::args_os()))
    }
}

/// Appends [`DEFAULT_MODE`] when the arguments hold nothing but the program name.
pub fn with_default_mode<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() == 1 {
        args.push(DEFAULT_MODE.into());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mode_defaults_to_dev() {
        let args = with_default_mode(["agent"]);
        assert_eq!(args, vec![OsString::from("agent"), OsString::from("dev")]);
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.mode, Mode::Dev);
    }

    #[test]
    fn test_explicit_mode_is_kept() {
        let args = with_default_mode(["agent", "start"]);
        assert_eq!(args.len(), 2);
        assert_eq!(Cli::try_parse_from(args).unwrap().mode, Mode::Start);

        let cli = Cli::try_parse_from(with_default_mode(["agent", "tools"])).unwrap();
        assert_eq!(cli.mode, Mode::Tools);
    }

    #[test]
    fn test_flags_without_mode_are_not_rewritten() {
        // Only a bare invocation gets the default; anything else goes to clap as-is.
        let args = with_default_mode(["agent", "--help"]);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(with_default_mode(["agent", "console"])).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
