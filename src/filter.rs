//! Filter pipeline that narrows a process snapshot.
//!
//! Each configured option becomes one `Filter`. A record survives only if it
//! passes every filter in the chain, so filters commute and the result never
//! grows. A filter that needs a field the record does not carry (the Cygwin
//! listing has no user, vsz, rss or pcpu) rejects the record.

use regex::Regex;

use crate::config::Config;
use crate::error::ConfigError;
use crate::process::{Identity, ProcessRecord};

/// One predicate derived from one configuration option.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Only this pid (from the pid file).
    Pid(u32),
    /// Drop the check's own process.
    ExcludeSelf(u32),
    /// Drop the check's parent process.
    ExcludeParent(u32),
    /// Unanchored regex search on the command line.
    CmdPattern(Regex),
    VszMin(u64),
    RssMin(u64),
    PcpuMin(f64),
    StateIn(Vec<String>),
    UserIn(Vec<String>),
}

impl Filter {
    pub fn matches(&self, record: &ProcessRecord) -> bool {
        match self {
            Filter::Pid(pid) => record.pid == *pid,
            Filter::ExcludeSelf(pid) | Filter::ExcludeParent(pid) => record.pid != *pid,
            Filter::CmdPattern(re) => re.is_match(&record.command),
            Filter::VszMin(min) => record.vsz.is_some_and(|v| v >= *min),
            Filter::RssMin(min) => record.rss.is_some_and(|v| v >= *min),
            Filter::PcpuMin(min) => record.pcpu.is_some_and(|v| v >= *min),
            Filter::StateIn(states) => states.iter().any(|s| *s == record.state),
            Filter::UserIn(users) => record
                .user
                .as_ref()
                .is_some_and(|u| users.iter().any(|candidate| candidate == u)),
        }
    }
}

/// Ordered list of active filters, built once per run.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    /// Builds the chain from the resolved configuration.
    ///
    /// `file_pid` is the pid already read from `config.file_pid`, if any.
    pub fn from_config(
        config: &Config,
        identity: &Identity,
        file_pid: Option<u32>,
    ) -> Result<Self, ConfigError> {
        let mut filters = Vec::new();

        if let Some(pid) = file_pid {
            filters.push(Filter::Pid(pid));
        }
        if !config.match_self {
            filters.push(Filter::ExcludeSelf(identity.pid));
        }
        if !config.match_parent {
            filters.push(Filter::ExcludeParent(identity.ppid));
        }
        if let Some(pattern) = config.cmd_pat.as_deref() {
            let re = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            filters.push(Filter::CmdPattern(re));
        }
        if let Some(min) = config.vsz {
            filters.push(Filter::VszMin(min));
        }
        if let Some(min) = config.rss {
            filters.push(Filter::RssMin(min));
        }
        if let Some(min) = config.pcpu {
            filters.push(Filter::PcpuMin(min));
        }
        if let Some(states) = &config.state {
            filters.push(Filter::StateIn(states.clone()));
        }
        if let Some(users) = &config.user {
            filters.push(Filter::UserIn(users.clone()));
        }

        Ok(Self { filters })
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn matches(&self, record: &ProcessRecord) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Keeps the records that pass every filter, preserving listing order.
    pub fn apply(&self, mut records: Vec<ProcessRecord>) -> Vec<ProcessRecord> {
        records.retain(|r| self.matches(r));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELF_PID: u32 = 4242;
    const PARENT_PID: u32 = 4200;

    fn identity() -> Identity {
        Identity {
            pid: SELF_PID,
            ppid: PARENT_PID,
        }
    }

    fn posix(pid: u32, user: &str, vsz: u64, rss: u64, pcpu: f64, state: &str, command: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid: None,
            user: Some(user.into()),
            vsz: Some(vsz),
            rss: Some(rss),
            pcpu: Some(pcpu),
            state: state.into(),
            command: command.into(),
        }
    }

    fn degraded(pid: u32, state: &str, command: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid: Some(1),
            user: None,
            vsz: None,
            rss: None,
            pcpu: None,
            state: state.into(),
            command: command.into(),
        }
    }

    fn snapshot() -> Vec<ProcessRecord> {
        vec![
            posix(1, "root", 168140, 11900, 0.0, "Ss", "/sbin/init splash"),
            posix(812, "postgres", 215400, 28112, 1.5, "S", "postgres: checkpointer"),
            posix(1204, "www-data", 55300, 5120, 12.0, "R", "nginx: worker process"),
            posix(2210, "root", 0, 0, 0.0, "Z", "[sh] <defunct>"),
            posix(SELF_PID, "root", 9000, 3000, 0.1, "R", "check-procs -p nginx"),
            posix(PARENT_PID, "sensu", 80000, 20000, 0.3, "S", "sensu-agent start"),
        ]
    }

    fn pids(records: &[ProcessRecord]) -> Vec<u32> {
        records.iter().map(|r| r.pid).collect()
    }

    fn chain(config: &Config) -> FilterChain {
        FilterChain::from_config(config, &identity(), None).unwrap()
    }

    #[test]
    fn test_default_chain_excludes_self_and_parent() {
        let out = chain(&Config::default()).apply(snapshot());
        assert_eq!(pids(&out), vec![1, 812, 1204, 2210]);
    }

    #[test]
    fn test_match_self_and_parent_keep_them() {
        let cfg = Config {
            match_self: true,
            match_parent: true,
            ..Config::default()
        };
        let out = chain(&cfg).apply(snapshot());
        assert_eq!(out.len(), snapshot().len());
    }

    #[test]
    fn test_command_pattern_is_unanchored() {
        let cfg = Config {
            cmd_pat: Some("nginx".into()),
            match_self: true,
            ..Config::default()
        };
        // The check's own command line mentions nginx too.
        let out = chain(&cfg).apply(snapshot());
        assert_eq!(pids(&out), vec![1204, SELF_PID]);
    }

    #[test]
    fn test_resource_minimums_are_inclusive() {
        let cfg = Config {
            rss: Some(11900),
            ..Config::default()
        };
        assert_eq!(pids(&chain(&cfg).apply(snapshot())), vec![1, 812]);

        let cfg = Config {
            vsz: Some(200000),
            ..Config::default()
        };
        assert_eq!(pids(&chain(&cfg).apply(snapshot())), vec![812]);

        let cfg = Config {
            pcpu: Some(1.5),
            ..Config::default()
        };
        assert_eq!(pids(&chain(&cfg).apply(snapshot())), vec![812, 1204]);
    }

    #[test]
    fn test_state_membership_is_exact() {
        let cfg = Config {
            state: Some(vec!["S".into(), "Z".into()]),
            ..Config::default()
        };
        // "Ss" is not "S"
        assert_eq!(pids(&chain(&cfg).apply(snapshot())), vec![812, 2210]);
    }

    #[test]
    fn test_user_membership() {
        let cfg = Config {
            user: Some(vec!["root".into()]),
            ..Config::default()
        };
        assert_eq!(pids(&chain(&cfg).apply(snapshot())), vec![1, 2210]);
    }

    #[test]
    fn test_file_pid_filter() {
        let out = FilterChain::from_config(&Config::default(), &identity(), Some(812))
            .unwrap()
            .apply(snapshot());
        assert_eq!(pids(&out), vec![812]);
    }

    #[test]
    fn test_missing_fields_fail_resource_filters() {
        let records = vec![degraded(10, "S", "/usr/bin/bash"), degraded(11, "Z", "sleep")];
        for cfg in [
            Config { vsz: Some(0), ..Config::default() },
            Config { rss: Some(0), ..Config::default() },
            Config { pcpu: Some(0.0), ..Config::default() },
            Config { user: Some(vec!["root".into()]), ..Config::default() },
        ] {
            assert!(chain(&cfg).apply(records.clone()).is_empty());
        }

        let cfg = Config {
            state: Some(vec!["Z".into()]),
            ..Config::default()
        };
        assert_eq!(pids(&chain(&cfg).apply(records)), vec![11]);
    }

    #[test]
    fn test_filters_only_narrow() {
        let configs = [
            Config::default(),
            Config { cmd_pat: Some("o".into()), ..Config::default() },
            Config { state: Some(vec!["R".into()]), rss: Some(1), ..Config::default() },
            Config { user: Some(vec!["root".into(), "postgres".into()]), pcpu: Some(0.0), ..Config::default() },
        ];
        let all = snapshot();
        for cfg in &configs {
            let out = chain(cfg).apply(all.clone());
            assert!(out.len() <= all.len());
            assert!(out.iter().all(|r| all.contains(r)));
            assert!(out.iter().all(|r| r.pid != SELF_PID));
        }
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let cfg = Config {
            cmd_pat: Some("^/".into()),
            user: Some(vec!["root".into()]),
            state: Some(vec!["Ss".into()]),
            ..Config::default()
        };
        let forward = chain(&cfg);
        let mut reversed = forward.filters().to_vec();
        reversed.reverse();
        let reversed = FilterChain { filters: reversed };
        assert_eq!(forward.apply(snapshot()), reversed.apply(snapshot()));
        assert_eq!(pids(&forward.apply(snapshot())), vec![1]);
    }

    #[test]
    fn test_chain_length_reflects_config() {
        assert_eq!(chain(&Config::default()).filters().len(), 2);
        let cfg = Config {
            match_self: true,
            match_parent: true,
            ..Config::default()
        };
        assert!(chain(&cfg).filters().is_empty());
    }
}
