//! check-procs - version 0.1.0
//!
//! Process count check with tracing logging.
//! This is the main entry point that resolves configuration, runs the check
//! (or a subcommand) and maps the verdict to the plugin exit code.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing::level_filters::LevelFilter;

use check_procs::cli::{usage_error_message, Args, Commands};
use check_procs::config::{
    render_config, resolve_config, validate_effective_config, Config, DEFAULT_LOG_LEVEL,
};
use check_procs::output::emit;
use check_procs::process::{detect_lister, Identity};
use check_procs::threshold::Severity;
use check_procs::run_check;
use commands::{command_config, command_list};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr; stdout is reserved for the check result line.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL) {
        "off" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "info" => LevelFilter::INFO,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::WARN,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }

    debug!(
        "Logging initialized with level: {} (build {} @ {})",
        log_level,
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    );
}

/// Helper function to load and validate configuration.
fn load_validated_config(args: &Args) -> anyhow::Result<Config> {
    let config = resolve_config(args)?;
    validate_effective_config(&config)?;
    Ok(config)
}

fn exit_with_error(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application entry point.
fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match usage_error_message(&e) {
            Some(message) => {
                let _ = e.print();
                return emit(Severity::Unknown, &message);
            }
            None => e.exit(),
        },
    };

    let config = match load_validated_config(&args) {
        Ok(c) => c,
        Err(e) => {
            if args.check_config {
                eprintln!("❌ Configuration invalid: {:#}", e);
            }
            return emit(Severity::Unknown, &format!("Configuration invalid: {:#}", e));
        }
    };

    setup_logging(&config);

    if args.check_config {
        println!("✅ Configuration is valid");
        return ExitCode::SUCCESS;
    }

    if args.show_config {
        return exit_with_error(
            render_config(&config, args.config_format).map(|out| println!("{out}")),
        );
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::List { all } => exit_with_error(command_list(*all, &config)),
            Commands::Config {
                output,
                format,
                commented,
            } => exit_with_error(command_config(output.clone(), *format, *commented)),
        };
    }

    let identity = Identity::current();
    debug!("Running check as pid {} (parent {})", identity.pid, identity.ppid);

    let lister = detect_lister();
    let outcome = run_check(&config, lister.as_ref(), &identity);
    emit(outcome.severity, &outcome.message)
}
