//! The core diagnostic type for the Tagflow error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, a source location, labeled source spans, and help text.

use std::fmt;

use crate::{
    error::{ErrorKind, Severity, error_code::ErrorCode, label::Label},
    span::{Location, Span},
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// order.tflow:4:9: error: too many events in column
///
/// error[E204]: too many events in column
///   --> order.tflow:4:9
///    |
///  4 |       <task id='d'/>
///    |        ^^^^ fourth event
///    |
///    = help: a `<col>` block holds at most three events
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    location: Location,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use tagflow_parser::error::{Diagnostic, ErrorCode};
    /// # use tagflow_parser::Span;
    ///
    /// let diag = Diagnostic::error("unknown row `middle`")
    ///     .with_code(ErrorCode::E202)
    ///     .with_label(Span::new(0..8), "invalid value")
    ///     .with_help("use `up`, `mid` or `down`");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Lexical, syntax or semantic; derived from the code.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.code.map(|code| code.kind())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based row and column of the offending token.
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Points the diagnostic at `location`.
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Format the diagnostic as a single `path:row:col: severity: message` line.
    ///
    /// # Example
    ///
    /// ```
    /// # use tagflow_parser::error::Diagnostic;
    /// # use tagflow_parser::Location;
    /// let diag = Diagnostic::error("unexpected end of file").at(Location::new(1, 18));
    /// assert_eq!(
    ///     diag.report_line("demo.tflow"),
    ///     "demo.tflow:1:18: error: unexpected end of file"
    /// );
    /// ```
    pub fn report_line(&self, path: &str) -> String {
        format!(
            "{path}:{}:{}: {}: {}",
            self.location.row(),
            self.location.col(),
            self.severity,
            self.message
        )
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            location: Location::default(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.kind().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert_eq!(diag.location(), Location::new(1, 1));
    }

    #[test]
    fn test_diagnostic_with_code_sets_kind() {
        let diag = Diagnostic::error("unexpected token").with_code(ErrorCode::E100);

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.kind(), Some(ErrorKind::Syntax));
    }

    #[test]
    fn test_diagnostic_labels() {
        let diag = Diagnostic::error("duplicate attribute `id`")
            .with_label(Span::new(10..12), "duplicate here")
            .with_secondary_label(Span::new(2..4), "first given here");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.primary_span(), Some(Span::new(10..12)));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("unknown event type `timer`").with_code(ErrorCode::E203);

        assert_eq!(diag.to_string(), "error[E203]: unknown event type `timer`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning("token truncated");

        assert_eq!(diag.to_string(), "warning: token truncated");
    }

    #[test]
    fn test_report_line_for_warning() {
        let diag = Diagnostic::warning("token truncated").at(Location::new(7, 2));

        assert_eq!(
            diag.report_line("a.tflow"),
            "a.tflow:7:2: warning: token truncated"
        );
    }
}
