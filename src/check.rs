//! Single check run: enumerate, filter, evaluate, compose.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::CheckError;
use crate::filter::FilterChain;
use crate::message::compose_message;
use crate::process::{Identity, ProcessLister, ProcessRecord};
use crate::threshold::{measure, Severity};

/// Verdict of one check run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub severity: Severity,
    pub message: String,
    /// The value that was classified; `None` when the run was UNKNOWN.
    pub count: Option<i64>,
}

impl CheckOutcome {
    fn unknown(err: &CheckError) -> Self {
        Self {
            severity: Severity::Unknown,
            message: err.to_string(),
            count: None,
        }
    }
}

/// Runs the check once. Every failure becomes an UNKNOWN outcome.
pub fn run_check(config: &Config, lister: &dyn ProcessLister, identity: &Identity) -> CheckOutcome {
    match evaluate(config, lister, identity) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Check could not be evaluated: {}", e);
            CheckOutcome::unknown(&e)
        }
    }
}

fn evaluate(
    config: &Config,
    lister: &dyn ProcessLister,
    identity: &Identity,
) -> Result<CheckOutcome, CheckError> {
    if let Some(metric) = config.metric {
        let kind = lister.kind();
        if !kind.reports(metric) {
            return Err(CheckError::UnsupportedMetric { metric, kind });
        }
    }

    let (pid, matched) = matching_processes(config, lister, identity)?;

    if let Some(metric) = config.metric {
        let missing = matched.iter().filter(|r| metric.value(r).is_none()).count();
        if missing > 0 {
            warn!(
                "{} of {} matching processes have no {} value; they add 0 to the sum",
                missing,
                matched.len(),
                metric
            );
        }
    }

    let count = measure(&matched, config.metric);
    let severity = config.thresholds().evaluate(count);
    let metric_total = config.metric.map(|_| count);
    let message = compose_message(matched.len(), config, pid, metric_total);

    debug!(
        matched = matched.len(),
        count,
        severity = %severity,
        "Check evaluated"
    );

    Ok(CheckOutcome {
        severity,
        message,
        count: Some(count),
    })
}

/// Lists processes and applies the configured filters.
///
/// Returns the pid read from the pid file (if configured) alongside the
/// surviving records.
pub fn matching_processes(
    config: &Config,
    lister: &dyn ProcessLister,
    identity: &Identity,
) -> Result<(Option<u32>, Vec<ProcessRecord>), CheckError> {
    let pid = config.file_pid.as_deref().map(read_pid_file).transpose()?;
    let chain = FilterChain::from_config(config, identity, pid)?;

    let kind = lister.kind();
    if !kind.reports_resources() && config.uses_resource_filters() {
        warn!(
            "The {} process listing has no user/vsz/rss/pcpu columns; \
             processes will not match those filters",
            kind
        );
    }

    let records = lister.list()?;
    let total = records.len();
    let matched = chain.apply(records);
    debug!(
        "{} of {} processes passed {} filters",
        matched.len(),
        total,
        chain.filters().len()
    );

    Ok((pid, matched))
}

/// Reads a pid file containing a single decimal pid.
pub fn read_pid_file(path: &Path) -> Result<u32, CheckError> {
    let pid_error = || CheckError::PidFile {
        path: path.to_path_buf(),
    };
    let content = fs::read_to_string(path).map_err(|e| {
        debug!("Failed to read pid file {}: {}", path.display(), e);
        pid_error()
    })?;
    content.trim().parse().map_err(|_| pid_error())
}
