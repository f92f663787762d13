//! CLI arguments and subcommands for check-procs.
//!
//! This module defines the command-line interface structure using the clap library.
//! Short flags follow the classic `check-procs` plugin so existing check
//! definitions keep working.

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::threshold::Metric;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug, Default)]
#[command(
    name = "check-procs",
    about = "Check the number of matching processes against warning/critical thresholds",
    long_about = "Check the number of matching processes against warning/critical thresholds.\n\n\
                  Lists running processes once, narrows them with the given filters and \
                  compares the resulting count (or the sum of a metric) with the thresholds. \
                  By default exactly one matching process is expected.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Trigger a warning if over this many matches (default: 1)
    #[arg(short = 'w', long, allow_negative_numbers = true)]
    pub warn_over: Option<i64>,

    /// Trigger a critical if over this many matches (default: 1)
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub crit_over: Option<i64>,

    /// Trigger a warning if under this many matches (default: 0)
    #[arg(short = 'W', long, allow_negative_numbers = true)]
    pub warn_under: Option<i64>,

    /// Trigger a critical if under this many matches (default: 0)
    #[arg(short = 'C', long, allow_negative_numbers = true)]
    pub crit_under: Option<i64>,

    /// Sum this field across matching processes instead of counting them
    #[arg(short = 't', long, value_enum)]
    pub metric: Option<Metric>,

    /// Do not exclude the check's own process from the count
    #[arg(short = 'm', long)]
    pub match_self: bool,

    /// Do not exclude the check's parent process from the count
    #[arg(short = 'M', long)]
    pub match_parent: bool,

    /// Match the command line against this regular expression
    #[arg(short = 'p', long = "pattern")]
    pub cmd_pat: Option<String>,

    /// Only match the pid read from this pid file
    #[arg(short = 'f', long)]
    pub file_pid: Option<PathBuf>,

    /// Only match processes with a virtual size of at least this
    #[arg(short = 'z', long)]
    pub vsz: Option<u64>,

    /// Only match processes with a resident size of at least this
    #[arg(short = 'r', long)]
    pub rss: Option<u64>,

    /// Only match processes using at least this much CPU (percent)
    #[arg(short = 'P', long)]
    pub pcpu: Option<f64>,

    /// Only match processes in one of these states (comma-separated, e.g. Z,D)
    #[arg(short = 's', long, value_delimiter = ',')]
    pub state: Option<Vec<String>>,

    /// Only match processes owned by one of these users (comma-separated)
    #[arg(short = 'u', long, value_delimiter = ',')]
    pub user: Option<Vec<String>>,

    /// Log level (logs go to stderr; default: warn)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 3 on error)
    #[arg(long)]
    pub check_config: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the processes that survive the configured filters
    List {
        /// Show every listed process, ignoring the filters
        #[arg(long)]
        all: bool,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}

/// Result line text for a command line clap rejected.
///
/// Returns `None` for `--help` and `--version`, which clap handles itself.
pub fn usage_error_message(err: &clap::Error) -> Option<String> {
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return None;
    }
    let rendered = err.to_string();
    let reason = rendered
        .lines()
        .next()
        .map(|line| line.trim_start_matches("error:").trim())
        .filter(|line| !line.is_empty())
        .unwrap_or("unrecognized command line");
    Some(format!("Invalid arguments: {}", reason))
}
