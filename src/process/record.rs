//! Normalized process record shared by every listing strategy.

/// One process as observed in a single listing snapshot.
///
/// `pid`, `state` and `command` are always present. The remaining fields are
/// only reported by the POSIX listing; the Cygwin listing leaves them `None`
/// (and is the only one that reports `ppid`).
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: Option<u32>,
    pub user: Option<String>,
    /// Virtual size as printed by the listing tool (KiB on procps).
    pub vsz: Option<u64>,
    /// Resident set size, same unit as `vsz`.
    pub rss: Option<u64>,
    pub pcpu: Option<f64>,
    pub state: String,
    pub command: String,
}

/// Pid and parent pid of the running check.
///
/// Passed explicitly into the filter pipeline so that self/parent exclusion
/// can be tested without a real process tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub pid: u32,
    pub ppid: u32,
}

impl Identity {
    /// Resolves the identity of the current process.
    pub fn current() -> Self {
        let ppid = nix::unistd::getppid().as_raw();
        Self {
            pid: std::process::id(),
            ppid: u32::try_from(ppid).unwrap_or(0),
        }
    }
}
