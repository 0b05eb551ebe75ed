//! Severity levels for diagnostics.

use std::fmt;

/// The severity level of a diagnostic.
///
/// - [`Severity::Error`] aborts the run
/// - [`Severity::Warning`] is advisory only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A fatal problem; no layout is produced.
    Error,

    /// A non-fatal remark about the input.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
