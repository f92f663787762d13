//! check-procs library
//!
//! A single-shot process health check. It lists the running processes once,
//! narrows them with a chain of filters, reduces the survivors to a count (or
//! the sum of one numeric field), and classifies that value against
//! warning/critical thresholds.
//!
//! # Usage
//!
//! ```rust,no_run
//! use check_procs::{detect_lister, run_check, Config, Identity};
//!
//! let config = Config {
//!     cmd_pat: Some("sshd".into()),
//!     ..Config::default()
//! };
//!
//! let lister = detect_lister();
//! let outcome = run_check(&config, lister.as_ref(), &Identity::current());
//! println!("{}: {}", outcome.severity, outcome.message);
//! ```
//!
//! Any `ProcessLister` can be plugged in, which is how the tests drive the
//! pipeline without a real process tree.

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod message;
pub mod output;
pub mod process;
pub mod threshold;

// Re-export main types for convenience
pub use check::{run_check, CheckOutcome};
pub use config::Config;
pub use error::{CheckError, ConfigError, EnumerationError};
pub use filter::{Filter, FilterChain};
pub use process::{detect_lister, Identity, ListerKind, ProcessLister, ProcessRecord};
pub use threshold::{Metric, Severity, Thresholds};
