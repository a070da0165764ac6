// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `sohd`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sohd",
    version,
    about = "Detach, then run a state-of-health script on a fixed interval forever.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `$SOHD_CONFIG`, then `Sohd.toml` in the current directory,
    /// then built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Stay attached to the terminal / parent (no fork, no setsid).
    #[arg(long)]
    pub foreground: bool,

    /// Run the script a single time, then exit without notifying anyone.
    #[arg(long)]
    pub once: bool,

    /// Check whether a supervisor is running and mail the operator if not.
    #[arg(long, conflicts_with_all = ["foreground", "once", "dry_run"])]
    pub check: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SOHD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Load + validate the config, print it, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_detach_and_loop_forever() {
        let args = CliArgs::try_parse_from(["sohd"]).unwrap();
        assert!(!args.foreground);
        assert!(!args.once);
        assert!(!args.check);
        assert!(args.config.is_none());
    }

    #[test]
    fn check_conflicts_with_run_flags() {
        assert!(CliArgs::try_parse_from(["sohd", "--check", "--once"]).is_err());
        assert!(CliArgs::try_parse_from(["sohd", "--check", "--config", "x.toml"]).is_ok());
    }

    #[test]
    fn log_level_parses_value_enum() {
        let args = CliArgs::try_parse_from(["sohd", "--log-level", "debug"]).unwrap();
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }
}
