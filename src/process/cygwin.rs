//! Cygwin `ps -aWl` listing.
//!
//! Cygwin's `ps` has no column selector, and every long format includes an
//! STIME column that can itself contain spaces. The process state is not a
//! real column either: it is the first character of the line and may be
//! blank. As of Cygwin `ps` revision 1.35 each line is printed with
//! `"%c %7d %7d %7d %10u %4s %4u %8s %s\n"`; the STIME byte range below is
//! tied to that layout and has to move if the layout ever changes.

use std::ops::Range;

use tracing::debug;

use crate::error::EnumerationError;
use crate::process::lister::{finish_snapshot, run_listing, split_columns, ListerKind, ProcessLister};
use crate::process::record::ProcessRecord;

const PS_PROGRAM: &str = "ps";
const PS_ARGS: [&str; 1] = ["-aWl"];

/// STIME plus its leading separator, measured after the state character.
const STIME_BYTES: Range<usize> = 45..54;

/// pid, ppid, pgid, winpid, tty, uid, command
const CYGWIN_COLUMNS: usize = 7;

/// Lists processes through Cygwin's `ps -aWl`.
///
/// Records carry `pid`, `ppid`, `state` and `command` only.
#[derive(Debug, Default)]
pub struct CygwinLister {
    helper_pids: Vec<u32>,
}

impl CygwinLister {
    pub fn new(helper_pids: Vec<u32>) -> Self {
        Self { helper_pids }
    }
}

impl ProcessLister for CygwinLister {
    fn kind(&self) -> ListerKind {
        ListerKind::Cygwin
    }

    fn list(&self) -> Result<Vec<ProcessRecord>, EnumerationError> {
        let output = run_listing(PS_PROGRAM, &PS_ARGS)?;
        let records = parse_cygwin_output(&output.stdout);

        let mut helpers = self.helper_pids.clone();
        helpers.push(output.child_pid);
        finish_snapshot(PS_PROGRAM, records, &helpers)
    }
}

/// Parses full `ps -aWl` output, discarding the header line.
pub fn parse_cygwin_output(text: &str) -> Vec<ProcessRecord> {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let record = parse_cygwin_line(line);
            if record.is_none() && !line.trim().is_empty() {
                debug!("Skipping unparsable ps -aWl line: {:?}", line);
            }
            record
        })
        .collect()
}

/// Parses one fixed-layout `ps -aWl` line.
pub fn parse_cygwin_line(line: &str) -> Option<ProcessRecord> {
    let mut chars = line.chars();
    let state = chars.next()?;
    let rest = chars.as_str();

    if rest.len() < STIME_BYTES.end
        || !rest.is_char_boundary(STIME_BYTES.start)
        || !rest.is_char_boundary(STIME_BYTES.end)
    {
        return None;
    }
    let spliced = format!("{}{}", &rest[..STIME_BYTES.start], &rest[STIME_BYTES.end..]);

    let cols = split_columns(&spliced, CYGWIN_COLUMNS)?;
    let pid = cols[0].parse().ok()?;

    Some(ProcessRecord {
        pid,
        ppid: cols[1].parse().ok(),
        user: None,
        vsz: None,
        rss: None,
        pcpu: None,
        state: state.to_string().trim().to_string(),
        command: cols[6].to_string(),
    })
}
