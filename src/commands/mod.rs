//! CLI command implementations for check-procs.
//!
//! This module provides implementations for the CLI subcommands:
//! - `list`: Show which processes the configured filters match
//! - `config`: Configuration file generation

pub mod config;
pub mod list;

// Re-export command functions
pub use config::command_config;
pub use list::command_list;
