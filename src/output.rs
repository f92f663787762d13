//! Monitoring-plugin output convention.
//!
//! A check prints exactly one `CheckProcs SEVERITY: message` line on stdout
//! and exits with 0 (OK), 1 (WARNING), 2 (CRITICAL) or 3 (UNKNOWN).

use std::process::ExitCode;

use crate::threshold::Severity;

/// Name printed in front of every result line.
pub const CHECK_NAME: &str = "CheckProcs";

pub fn format_line(severity: Severity, message: &str) -> String {
    format!("{} {}: {}", CHECK_NAME, severity, message)
}

/// Prints the result line and returns the matching exit code.
pub fn emit(severity: Severity, message: &str) -> ExitCode {
    println!("{}", format_line(severity, message));
    ExitCode::from(severity.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(Severity::Critical, "Found 3 matching processes"),
            "CheckProcs CRITICAL: Found 3 matching processes"
        );
        assert_eq!(format_line(Severity::Ok, "x"), "CheckProcs OK: x");
    }
}
