//! POSIX `ps` listing with an explicit column selector.

use tracing::debug;

use crate::error::EnumerationError;
use crate::process::lister::{finish_snapshot, run_listing, split_columns, ListerKind, ProcessLister};
use crate::process::record::ProcessRecord;

const PS_PROGRAM: &str = "ps";
const PS_ARGS: [&str; 2] = ["axwwo", "user,pid,vsz,rss,pcpu,state,command"];
const PS_COLUMNS: usize = 7;

/// Lists processes with `ps axwwo user,pid,vsz,rss,pcpu,state,command`.
#[derive(Debug, Default)]
pub struct PsLister {
    helper_pids: Vec<u32>,
}

impl PsLister {
    /// `helper_pids` are pids spawned by the check itself (e.g. the platform
    /// probe) that must never be counted.
    pub fn new(helper_pids: Vec<u32>) -> Self {
        Self { helper_pids }
    }
}

impl ProcessLister for PsLister {
    fn kind(&self) -> ListerKind {
        ListerKind::Posix
    }

    fn list(&self) -> Result<Vec<ProcessRecord>, EnumerationError> {
        let output = run_listing(PS_PROGRAM, &PS_ARGS)?;
        let records = parse_ps_output(&output.stdout);

        let mut helpers = self.helper_pids.clone();
        helpers.push(output.child_pid);
        finish_snapshot(PS_PROGRAM, records, &helpers)
    }
}

/// Parses full `ps` output, discarding the header line.
pub fn parse_ps_output(text: &str) -> Vec<ProcessRecord> {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let record = parse_ps_line(line);
            if record.is_none() && !line.trim().is_empty() {
                debug!("Skipping unparsable ps line: {:?}", line);
            }
            record
        })
        .collect()
}

/// Parses one `user pid vsz rss pcpu state command` line.
///
/// Lines without all seven columns or with a non-numeric pid are rejected.
/// Resource columns that do not parse are left as `None`.
pub fn parse_ps_line(line: &str) -> Option<ProcessRecord> {
    let cols = split_columns(line, PS_COLUMNS)?;
    let pid = cols[1].parse().ok()?;

    Some(ProcessRecord {
        pid,
        ppid: None,
        user: Some(cols[0].to_string()),
        vsz: cols[2].parse().ok(),
        rss: cols[3].parse().ok(),
        pcpu: cols[4].parse().ok(),
        state: cols[5].to_string(),
        command: cols[6].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
USER         PID    VSZ   RSS %CPU STAT COMMAND
root           1 168140 11900  0.0 Ss   /sbin/init splash
postgres     812 215400 28112  1.5 S    postgres: 14/main: checkpointer
www-data    1204  55300  5120 12.0 R    nginx: worker process
root        2210      0     0  0.0 Z    [defunct-child] <defunct>
";

    #[test]
    fn test_parse_ps_output_skips_header() {
        let records = parse_ps_output(SAMPLE);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].pid, 1);
        assert_eq!(records[3].pid, 2210);
    }

    #[test]
    fn test_parse_ps_line_fields() {
        let r = parse_ps_line("postgres     812 215400 28112  1.5 S    postgres: 14/main: checkpointer")
            .unwrap();
        assert_eq!(r.user.as_deref(), Some("postgres"));
        assert_eq!(r.pid, 812);
        assert_eq!(r.ppid, None);
        assert_eq!(r.vsz, Some(215400));
        assert_eq!(r.rss, Some(28112));
        assert_eq!(r.pcpu, Some(1.5));
        assert_eq!(r.state, "S");
        assert_eq!(r.command, "postgres: 14/main: checkpointer");
    }

    #[test]
    fn test_parse_ps_line_preserves_inner_spaces() {
        let r = parse_ps_line("bob 99 10 10 0.0 S sh -c 'echo  two   spaces'").unwrap();
        assert_eq!(r.command, "sh -c 'echo  two   spaces'");
    }

    #[test]
    fn test_parse_ps_line_rejects_bad_pid() {
        assert!(parse_ps_line("root abc 1 1 0.0 S init").is_none());
    }

    #[test]
    fn test_parse_ps_line_rejects_short_line() {
        assert!(parse_ps_line("root 1 1 1 0.0 S").is_none());
    }

    #[test]
    fn test_parse_ps_line_non_numeric_resources() {
        let r = parse_ps_line("root 5 - - - S kworker").unwrap();
        assert_eq!(r.vsz, None);
        assert_eq!(r.rss, None);
        assert_eq!(r.pcpu, None);
    }

    #[test]
    fn test_parse_ps_output_header_only() {
        assert!(parse_ps_output("USER PID VSZ RSS %CPU STAT COMMAND\n").is_empty());
        assert!(parse_ps_output("").is_empty());
    }

    #[test]
    fn test_ps_lister_kind() {
        assert_eq!(PsLister::default().kind(), ListerKind::Posix);
    }
}
