//! Threshold evaluation for the final process count.
//!
//! The count is either the number of surviving records or, in metric mode,
//! the sum of one numeric field across them. Four independent bounds then
//! classify it:
//!
//! - status is `Critical` if count < crit_under or count > crit_over
//! - status is `Warning` if count < warn_under or count > warn_over
//! - otherwise `Ok`
//!
//! Both comparisons are strict, so a count equal to a bound is fine for that
//! bound. The defaults (1/1/0/0) mean "exactly one matching process".

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::process::ProcessRecord;

pub const DEFAULT_WARN_OVER: i64 = 1;
pub const DEFAULT_CRIT_OVER: i64 = 1;
pub const DEFAULT_WARN_UNDER: i64 = 0;
pub const DEFAULT_CRIT_UNDER: i64 = 0;

/// Check verdict, in increasing order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    /// No process data could be obtained.
    Unknown,
}

impl Severity {
    /// Conventional monitoring-plugin exit code.
    pub fn exit_code(self) -> u8 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Numeric record field that can be summed instead of counting records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Pid,
    Ppid,
    Vsz,
    Rss,
    Pcpu,
}

impl Metric {
    /// Integer value of this field for one record, if the record has it.
    /// CPU percentages are truncated toward zero.
    pub fn value(self, record: &ProcessRecord) -> Option<i64> {
        match self {
            Metric::Pid => Some(i64::from(record.pid)),
            Metric::Ppid => record.ppid.map(i64::from),
            Metric::Vsz => record.vsz.map(saturating_i64),
            Metric::Rss => record.rss.map(saturating_i64),
            Metric::Pcpu => record.pcpu.map(|p| p.trunc() as i64),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::Pid => "pid",
            Metric::Ppid => "ppid",
            Metric::Vsz => "vsz",
            Metric::Rss => "rss",
            Metric::Pcpu => "pcpu",
        };
        f.write_str(s)
    }
}

fn saturating_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Reduces the filtered records to the value that gets classified.
///
/// Without a metric this is the record count. With one, it is the sum of
/// that field; records lacking the field contribute nothing, and an empty
/// set sums to zero.
pub fn measure(records: &[ProcessRecord], metric: Option<Metric>) -> i64 {
    match metric {
        None => saturating_i64(records.len() as u64),
        Some(m) => records
            .iter()
            .filter_map(|r| m.value(r))
            .fold(0i64, |acc, v| acc.saturating_add(v)),
    }
}

/// The four warning/critical bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub warn_over: i64,
    pub crit_over: i64,
    pub warn_under: i64,
    pub crit_under: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warn_over: DEFAULT_WARN_OVER,
            crit_over: DEFAULT_CRIT_OVER,
            warn_under: DEFAULT_WARN_UNDER,
            crit_under: DEFAULT_CRIT_UNDER,
        }
    }
}

impl Thresholds {
    /// Classifies `count`. Critical bounds are checked before warning bounds.
    pub fn evaluate(&self, count: i64) -> Severity {
        if count < self.crit_under || count > self.crit_over {
            return Severity::Critical;
        }
        if count < self.warn_under || count > self.warn_over {
            return Severity::Warning;
        }
        Severity::Ok
    }
}
