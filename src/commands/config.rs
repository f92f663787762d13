//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use check_procs::cli::ConfigFormat;
use check_procs::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> anyhow::Result<()> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from(default_file_name(format)));

    let mut content = render_config(&config, format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

fn default_file_name(format: ConfigFormat) -> &'static str {
    match format {
        ConfigFormat::Yaml => "check-procs.yaml",
        ConfigFormat::Json => "check-procs.json",
        ConfigFormat::Toml => "check-procs.toml",
    }
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# check-procs Configuration
# ==========================
#
# Thresholds (strict comparisons; defaults expect exactly one match)
# ----------
# warn_over: 1                 # WARNING if count > warn_over
# crit_over: 1                 # CRITICAL if count > crit_over
# warn_under: 0                # WARNING if count < warn_under
# crit_under: 0                # CRITICAL if count < crit_under
# metric: null                 # pid, ppid, vsz, rss or pcpu: sum this field instead of counting
#
# Self/parent exclusion
# ---------------------
# match_self: false            # Count the check's own process
# match_parent: false          # Count the check's parent process
#
# Filters (all active filters must match)
# -------
# cmd_pat: null                # Regex searched in the full command line
# file_pid: null               # Pid file; only that pid matches
# vsz: null                    # Minimum virtual size
# rss: null                    # Minimum resident size
# pcpu: null                   # Minimum CPU percent
# state: null                  # e.g. ["Z", "D"]
# user: null                   # e.g. ["root", "postgres"]
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace (stderr)
"#;

    format!("{comments}\n{yaml}")
}
