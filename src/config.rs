//! Configuration management for check-procs.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats. Everything is
//! resolved and validated before a check runs; the check itself treats the
//! configuration as trusted input.

use crate::cli::{Args, ConfigFormat};
use crate::error::ConfigError;
use crate::threshold::{
    Metric, Thresholds, DEFAULT_CRIT_OVER, DEFAULT_CRIT_UNDER, DEFAULT_WARN_OVER,
    DEFAULT_WARN_UNDER,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Default config file locations, tried in order when `--config` is absent.
const DEFAULT_CONFIG_PATHS: [&str; 7] = [
    "/etc/check-procs/check-procs.yaml",
    "/etc/check-procs/check-procs.yml",
    "/etc/check-procs/check-procs.json",
    "/etc/check-procs/check-procs.toml",
    "./check-procs.yaml",
    "./check-procs.yml",
    "./check-procs.json",
];

/// Effective check configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Thresholds
    #[serde(alias = "warn-over")]
    pub warn_over: i64,
    #[serde(alias = "crit-over")]
    pub crit_over: i64,
    #[serde(alias = "warn-under")]
    pub warn_under: i64,
    #[serde(alias = "crit-under")]
    pub crit_under: i64,

    /// Sum this field instead of counting processes
    pub metric: Option<Metric>,

    // Self/parent exclusion overrides
    #[serde(alias = "match-self")]
    pub match_self: bool,
    #[serde(alias = "match-parent")]
    pub match_parent: bool,

    // Filters
    /// Regular expression matched against the full command line
    #[serde(alias = "cmd-pat", alias = "pattern")]
    pub cmd_pat: Option<String>,
    /// Pid file whose pid is the only one allowed to match
    #[serde(alias = "file-pid")]
    pub file_pid: Option<PathBuf>,
    pub vsz: Option<u64>,
    pub rss: Option<u64>,
    pub pcpu: Option<f64>,
    pub state: Option<Vec<String>>,
    pub user: Option<Vec<String>>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            warn_over: DEFAULT_WARN_OVER,
            crit_over: DEFAULT_CRIT_OVER,
            warn_under: DEFAULT_WARN_UNDER,
            crit_under: DEFAULT_CRIT_UNDER,
            metric: None,
            match_self: false,
            match_parent: false,
            cmd_pat: None,
            file_pid: None,
            vsz: None,
            rss: None,
            pcpu: None,
            state: None,
            user: None,
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
        }
    }
}

impl Config {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            warn_over: self.warn_over,
            crit_over: self.crit_over,
            warn_under: self.warn_under,
            crit_under: self.crit_under,
        }
    }

    /// Whether any filter needs a field the Cygwin listing does not report.
    pub fn uses_resource_filters(&self) -> bool {
        self.user.is_some() || self.vsz.is_some() || self.rss.is_some() || self.pcpu.is_some()
    }
}

/// Validate effective config (used by --check-config and before every run)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(pattern) = cfg.cmd_pat.as_deref() {
        Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    }

    if let Some(pcpu) = cfg.pcpu {
        if !pcpu.is_finite() || pcpu < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pcpu",
                reason: format!("expected a non-negative percentage, got {}", pcpu),
            });
        }
    }

    validate_list("state", cfg.state.as_deref())?;
    validate_list("user", cfg.user.as_deref())?;

    if let Some(path) = &cfg.file_pid {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "file_pid",
                reason: "path is empty".into(),
            });
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        match level {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "log_level",
                    reason: format!(
                        "'{}', expected one of off, error, warn, info, debug, trace",
                        other
                    ),
                });
            }
        }
    }

    Ok(())
}

fn validate_list(field: &'static str, values: Option<&[String]>) -> Result<(), ConfigError> {
    if let Some(values) = values {
        if values.is_empty() {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "list is empty".into(),
            });
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "list contains an empty entry".into(),
            });
        }
    }
    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Thresholds
    if let Some(n) = args.warn_over {
        config.warn_over = n;
    }
    if let Some(n) = args.crit_over {
        config.crit_over = n;
    }
    if let Some(n) = args.warn_under {
        config.warn_under = n;
    }
    if let Some(n) = args.crit_under {
        config.crit_under = n;
    }
    if args.metric.is_some() {
        config.metric = args.metric;
    }

    // Exclusion overrides can only be switched on from the CLI
    if args.match_self {
        config.match_self = true;
    }
    if args.match_parent {
        config.match_parent = true;
    }

    // Filters: CLI wins if provided
    if let Some(pattern) = &args.cmd_pat {
        config.cmd_pat = Some(pattern.clone());
    }
    if let Some(path) = &args.file_pid {
        config.file_pid = Some(path.clone());
    }
    if args.vsz.is_some() {
        config.vsz = args.vsz;
    }
    if args.rss.is_some() {
        config.rss = args.rss;
    }
    if args.pcpu.is_some() {
        config.pcpu = args.pcpu;
    }
    if let Some(states) = &args.state {
        config.state = Some(trim_list(states));
    }
    if let Some(users) = &args.user {
        config.user = Some(trim_list(users));
    }

    if let Some(level) = args.log_level {
        config.log_level = Some(format!("{:?}", level).to_lowercase());
    }

    Ok(config)
}

fn trim_list(values: &[String]) -> Vec<String> {
    values.iter().map(|s| s.trim().to_string()).collect()
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match DEFAULT_CONFIG_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
        {
            Some(p) => p.to_path_buf(),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let parse_error = |message: String| ConfigError::Parse {
        path: path.clone(),
        message,
    };

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        // Default to YAML
        _ => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
    };

    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Renders configuration in requested format
pub fn render_config(config: &Config, format: ConfigFormat) -> anyhow::Result<String> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}
