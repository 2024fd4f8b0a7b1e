//! Diagnostic severity.

use std::fmt;

/// How serious a [`Diagnostic`](super::Diagnostic) is.
///
/// Ordered so that `Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Reported alongside a successful compilation, e.g. a truncated token.
    Warning,

    /// Stops compilation.
    Error,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        *self == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        *self == Severity::Warning
    }

    /// Lowercase name as printed in `path:row:col: severity: message` reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_names_and_order() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error.is_error() && !Severity::Error.is_warning());
    }
}
