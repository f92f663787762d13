//! Process enumeration.
//!
//! This module provides:
//! - `record`: the normalized `ProcessRecord` and the check's own `Identity`
//! - `lister`: the `ProcessLister` trait and runtime strategy selection
//! - `posix`: `ps axwwo ...` listing and parser
//! - `cygwin`: Cygwin `ps -aWl` listing and fixed-layout parser

pub mod cygwin;
pub mod lister;
pub mod posix;
pub mod record;

// Re-export commonly used types
pub use cygwin::{parse_cygwin_line, parse_cygwin_output, CygwinLister};
pub use lister::{detect_lister, ListerKind, ProcessLister};
pub use posix::{parse_ps_line, parse_ps_output, PsLister};
pub use record::{Identity, ProcessRecord};
