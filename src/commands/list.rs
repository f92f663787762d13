//! List command implementation.
//!
//! Prints the processes the configured filters match, which makes it easy to
//! tune a pattern before wiring the check into a monitoring agent.

use check_procs::check::matching_processes;
use check_procs::config::Config;
use check_procs::process::{detect_lister, Identity, ProcessRecord};
use check_procs::threshold::measure;

/// Lists matching processes (or every process with `all`).
pub fn command_list(all: bool, config: &Config) -> anyhow::Result<()> {
    let lister = detect_lister();
    let identity = Identity::current();

    let records = if all {
        lister.list()?
    } else {
        matching_processes(config, lister.as_ref(), &identity)?.1
    };

    println!("🔍 check-procs - {} listing", lister.kind());
    println!(
        "{:>7} {:<12} {:<5} {:>10} {:>10} {:>6}  COMMAND",
        "PID", "USER", "STATE", "VSZ", "RSS", "%CPU"
    );
    for record in &records {
        println!("{}", format_row(record));
    }

    println!();
    if all {
        println!("📋 {} processes listed (filters ignored)", records.len());
    } else {
        let count = measure(&records, config.metric);
        println!(
            "📋 {} processes matched, count = {} -> {}",
            records.len(),
            count,
            config.thresholds().evaluate(count)
        );
    }
    Ok(())
}

fn format_row(r: &ProcessRecord) -> String {
    format!(
        "{:>7} {:<12} {:<5} {:>10} {:>10} {:>6}  {}",
        r.pid,
        r.user.as_deref().unwrap_or("-"),
        r.state,
        dash_or(r.vsz),
        dash_or(r.rss),
        r.pcpu.map(|p| format!("{:.1}", p)).unwrap_or_else(|| "-".into()),
        r.command
    )
}

fn dash_or(v: Option<u64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}
