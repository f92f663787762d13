//! Human-readable check message.

use std::fmt::Write;

use crate::config::Config;

/// Renders the one-line explanation for a check result.
///
/// `matched` is the number of surviving records, `pid` the pid read from the
/// pid file, and `metric_total` the summed metric when one is configured.
/// Clauses always appear in the same order: cmd, state, user, vsz, rss, pcpu,
/// pid, metric.
pub fn compose_message(
    matched: usize,
    config: &Config,
    pid: Option<u32>,
    metric_total: Option<i64>,
) -> String {
    let mut msg = format!("Found {} matching processes", matched);

    // Writing to a String cannot fail
    if let Some(pattern) = &config.cmd_pat {
        let _ = write!(msg, "; cmd /{}/", pattern);
    }
    if let Some(states) = &config.state {
        let _ = write!(msg, "; state {}", states.join(","));
    }
    if let Some(users) = &config.user {
        let _ = write!(msg, "; user {}", users.join(","));
    }
    if let Some(vsz) = config.vsz {
        let _ = write!(msg, "; vsz >= {}", vsz);
    }
    if let Some(rss) = config.rss {
        let _ = write!(msg, "; rss >= {}", rss);
    }
    if let Some(pcpu) = config.pcpu {
        let _ = write!(msg, "; pcpu >= {}", pcpu);
    }
    if let Some(pid) = pid {
        let _ = write!(msg, "; pid {}", pid);
    }
    if let (Some(metric), Some(total)) = (config.metric, metric_total) {
        let _ = write!(msg, "; {} == {}", metric, total);
    }

    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::Metric;

    #[test]
    fn test_plain_count() {
        assert_eq!(
            compose_message(3, &Config::default(), None, None),
            "Found 3 matching processes"
        );
    }

    #[test]
    fn test_clause_order_is_fixed() {
        let cfg = Config {
            cmd_pat: Some("chef-client".into()),
            state: Some(vec!["S".into(), "R".into()]),
            user: Some(vec!["root".into()]),
            vsz: Some(1000),
            rss: Some(500),
            pcpu: Some(2.5),
            metric: Some(Metric::Rss),
            ..Config::default()
        };
        assert_eq!(
            compose_message(2, &cfg, Some(77), Some(1234)),
            "Found 2 matching processes; cmd /chef-client/; state S,R; user root; \
             vsz >= 1000; rss >= 500; pcpu >= 2.5; pid 77; rss == 1234"
        );
    }

    #[test]
    fn test_metric_clause_needs_total() {
        let cfg = Config {
            metric: Some(Metric::Vsz),
            ..Config::default()
        };
        assert_eq!(
            compose_message(0, &cfg, None, Some(0)),
            "Found 0 matching processes; vsz == 0"
        );
        assert_eq!(compose_message(0, &cfg, None, None), "Found 0 matching processes");
    }
}
