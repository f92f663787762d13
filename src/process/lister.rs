//! Listing strategy selection and the shared plumbing around running `ps`.

use std::fmt;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::EnumerationError;
use crate::process::cygwin::CygwinLister;
use crate::process::posix::PsLister;
use crate::process::record::ProcessRecord;
use crate::threshold::Metric;

/// Which listing layout a lister understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListerKind {
    /// `ps axwwo user,pid,vsz,rss,pcpu,state,command`
    Posix,
    /// Cygwin `ps -aWl`, no column selector.
    Cygwin,
}

impl ListerKind {
    /// Whether records carry `user`, `vsz`, `rss` and `pcpu`.
    pub fn reports_resources(self) -> bool {
        matches!(self, ListerKind::Posix)
    }

    /// Whether records carry the field `metric` sums.
    ///
    /// The POSIX column list has no ppid; Cygwin has no resource columns.
    pub fn reports(self, metric: Metric) -> bool {
        match metric {
            Metric::Pid => true,
            Metric::Ppid => matches!(self, ListerKind::Cygwin),
            Metric::Vsz | Metric::Rss | Metric::Pcpu => self.reports_resources(),
        }
    }
}

impl fmt::Display for ListerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListerKind::Posix => write!(f, "posix"),
            ListerKind::Cygwin => write!(f, "cygwin"),
        }
    }
}

/// Produces one snapshot of the running processes.
pub trait ProcessLister {
    fn kind(&self) -> ListerKind;

    /// Runs the listing once and returns every parsed record.
    fn list(&self) -> Result<Vec<ProcessRecord>, EnumerationError>;
}

/// Picks the listing strategy for this host.
///
/// Cygwin's `ps` accepts `-W` (show Windows processes) and exits 0; procps
/// and BSD `ps` reject it. The probe's pid is handed to the chosen lister so
/// it never shows up in the snapshot.
pub fn detect_lister() -> Box<dyn ProcessLister> {
    let (is_cygwin, probe_pid) = probe_cygwin();
    let helper_pids: Vec<u32> = probe_pid.into_iter().collect();

    if is_cygwin {
        debug!("ps accepts -W, using the Cygwin listing layout");
        Box::new(CygwinLister::new(helper_pids))
    } else {
        debug!("Using the POSIX ps listing layout");
        Box::new(PsLister::new(helper_pids))
    }
}

fn probe_cygwin() -> (bool, Option<u32>) {
    let child = Command::new("ps")
        .arg("-W")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(c) => c,
        Err(e) => {
            debug!("ps -W probe could not be spawned: {}", e);
            return (false, None);
        }
    };

    let probe_pid = child.id();
    match child.wait() {
        Ok(status) => (status.success(), Some(probe_pid)),
        Err(e) => {
            debug!("ps -W probe did not complete: {}", e);
            (false, Some(probe_pid))
        }
    }
}

/// Raw output of one listing invocation.
pub(crate) struct ListingOutput {
    pub stdout: String,
    /// Pid of the listing tool itself, which appears in its own output.
    pub child_pid: u32,
}

/// Runs the listing tool to completion. No timeout is applied.
pub(crate) fn run_listing(program: &str, args: &[&str]) -> Result<ListingOutput, EnumerationError> {
    let spawn_error = |source| EnumerationError::Spawn {
        program: program.to_string(),
        source,
    };

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    let child_pid = child.id();
    let output = child.wait_with_output().map_err(spawn_error)?;

    if !output.status.success() {
        warn!("{} {} exited with {}", program, args.join(" "), output.status);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        if !line.trim().is_empty() {
            warn!("{}: {}", program, line.trim());
        }
    }

    Ok(ListingOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        child_pid,
    })
}

/// Rejects an empty snapshot and drops the check's own helper processes.
pub(crate) fn finish_snapshot(
    program: &str,
    mut records: Vec<ProcessRecord>,
    helper_pids: &[u32],
) -> Result<Vec<ProcessRecord>, EnumerationError> {
    if records.is_empty() {
        return Err(EnumerationError::NoProcesses {
            program: program.to_string(),
        });
    }
    records.retain(|r| !helper_pids.contains(&r.pid));
    debug!("{} returned {} process records", program, records.len());
    Ok(records)
}

/// Splits a line on runs of whitespace into exactly `count` columns.
///
/// The last column keeps the remainder of the line verbatim, so commands with
/// embedded spaces survive intact. Returns `None` when fewer columns exist.
pub(crate) fn split_columns(line: &str, count: usize) -> Option<Vec<&str>> {
    let mut columns = Vec::with_capacity(count);
    let mut rest = line.trim();
    if rest.is_empty() || count == 0 {
        return None;
    }

    while columns.len() + 1 < count {
        let end = rest.find(char::is_whitespace)?;
        columns.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    columns.push(rest);
    Some(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u32) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid: None,
            user: None,
            vsz: None,
            rss: None,
            pcpu: None,
            state: "S".into(),
            command: "sleep 60".into(),
        }
    }

    #[test]
    fn test_split_columns_keeps_command_whitespace() {
        let cols = split_columns("  root   1  /sbin/init   splash  --x ", 3).unwrap();
        assert_eq!(cols, vec!["root", "1", "/sbin/init   splash  --x"]);
    }

    #[test]
    fn test_split_columns_too_few() {
        assert!(split_columns("root 1", 3).is_none());
        assert!(split_columns("", 1).is_none());
        assert!(split_columns("   ", 2).is_none());
    }

    #[test]
    fn test_split_columns_exact() {
        let cols = split_columns("a b c", 3).unwrap();
        assert_eq!(cols, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_finish_snapshot_drops_helpers() {
        let records = vec![record(1), record(42), record(77)];
        let out = finish_snapshot("ps", records, &[42, 77]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pid, 1);
    }

    #[test]
    fn test_finish_snapshot_rejects_empty() {
        let err = finish_snapshot("ps", Vec::new(), &[]).unwrap_err();
        assert!(matches!(err, EnumerationError::NoProcesses { .. }));
    }

    #[test]
    fn test_run_listing_missing_program() {
        let err = run_listing("/nonexistent/definitely-not-ps", &[]).err().unwrap();
        assert!(matches!(err, EnumerationError::Spawn { .. }));
    }

    #[test]
    fn test_lister_kind_resources() {
        assert!(ListerKind::Posix.reports_resources());
        assert!(!ListerKind::Cygwin.reports_resources());
        assert_eq!(ListerKind::Cygwin.to_string(), "cygwin");
    }

    #[test]
    fn test_lister_kind_reports_metric() {
        assert!(ListerKind::Posix.reports(Metric::Pid));
        assert!(ListerKind::Posix.reports(Metric::Rss));
        assert!(!ListerKind::Posix.reports(Metric::Ppid));

        assert!(ListerKind::Cygwin.reports(Metric::Pid));
        assert!(ListerKind::Cygwin.reports(Metric::Ppid));
        for metric in [Metric::Vsz, Metric::Rss, Metric::Pcpu] {
            assert!(!ListerKind::Cygwin.reports(metric));
        }
    }
}
