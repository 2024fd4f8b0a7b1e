//! Error adapter for converting TagflowError to miette diagnostics.
//!
//! This module bridges the library's error types and miette's graphical
//! report handler, and formats the one-line `path:row:col` reports used by
//! default.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, Severity as MietteSeverity,
    SourceSpan,
};

use tagflow::TagflowError;
use tagflow_parser::{
    Span,
    error::{Diagnostic, LabelStyle, Severity},
};

use crate::args::ReportStyle;

/// Adapter for a single compiler diagnostic.
///
/// This adapter wraps a [`Diagnostic`] and implements [`MietteDiagnostic`]
/// to enable rich error formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            match label.style() {
                LabelStyle::Primary => LabeledSpan::new_primary_with_span(message, span),
                LabelStyle::Secondary => LabeledSpan::new_with_span(message, span),
            }
        })))
    }
}

/// Adapter for [`TagflowError`] variants without a source location.
#[derive(Debug)]
pub struct ErrorAdapter<'a>(pub &'a TagflowError);

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TagflowError::Io(_) => "tagflow::io",
            TagflowError::Compile { .. } => return None,
            TagflowError::Config(_) => "tagflow::config",
        };
        Some(Box::new(code))
    }
}

/// Convert a tagflow [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Format a failed run for stderr.
///
/// `path` names the input file in short reports. Fancy reports fall back to
/// the short form if miette fails to render.
pub fn render_error(err: &TagflowError, path: &str, style: ReportStyle) -> String {
    let short = match err {
        TagflowError::Compile { diagnostic, .. } => diagnostic.report_line(path),
        other => format!("{path}: error: {other}"),
    };
    if style == ReportStyle::Short {
        return short;
    }

    let handler = GraphicalReportHandler::new();
    let mut writer = String::new();
    let rendered = match err {
        TagflowError::Compile {
            diagnostic, src, ..
        } => handler.render_report(&mut writer, &DiagnosticAdapter::new(diagnostic, src)),
        other => handler.render_report(&mut writer, &ErrorAdapter(other)),
    };
    match rendered {
        Ok(()) => writer,
        Err(_) => short,
    }
}

#[cfg(test)]
mod tests {
    use tagflow_parser::{Location, error::ErrorCode};

    use super::*;

    fn compile_error() -> TagflowError {
        let diag = Diagnostic::error("unexpected end of file, expected `>`")
            .with_code(ErrorCode::E101)
            .at(Location::new(1, 18))
            .with_label(Span::new(17..17), "here")
            .with_help("close the tag");
        TagflowError::new_compile_error(diag, "<process name='X'")
    }

    #[test]
    fn test_diagnostic_adapter_fields() {
        let err = compile_error();
        let TagflowError::Compile {
            diagnostic, src, ..
        } = &err
        else {
            panic!("Expected Compile");
        };
        let adapter = DiagnosticAdapter::new(diagnostic, src);

        assert_eq!(adapter.to_string(), "unexpected end of file, expected `>`");
        assert_eq!(adapter.code().unwrap().to_string(), "E101");
        assert_eq!(adapter.help().unwrap().to_string(), "close the tag");
        assert_eq!(adapter.severity(), Some(MietteSeverity::Error));
    }

    #[test]
    fn test_error_adapter_codes() {
        let err = TagflowError::Config("bad section".to_string());
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.to_string(), "Configuration error: bad section");
        assert_eq!(adapter.code().unwrap().to_string(), "tagflow::config");

        let compile = compile_error();
        assert!(ErrorAdapter(&compile).code().is_none());
    }

    #[test]
    fn test_labels_keep_primary_flag() {
        let diag = Diagnostic::error("duplicate attribute `id`")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");
        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary"));
        assert!(labels[0].primary());
        assert_eq!(labels[1].label(), Some("secondary"));
        assert!(!labels[1].primary());
    }

    #[test]
    fn test_warning_severity() {
        let diag = Diagnostic::warning("token truncated");
        let adapter = DiagnosticAdapter::new(&diag, "");
        assert_eq!(adapter.severity(), Some(MietteSeverity::Warning));
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_render_short() {
        let err = compile_error();
        assert_eq!(
            render_error(&err, "x.tflow", ReportStyle::Short),
            "x.tflow:1:18: error: unexpected end of file, expected `>`"
        );

        let err = TagflowError::Config("bad section".to_string());
        assert_eq!(
            render_error(&err, "x.tflow", ReportStyle::Short),
            "x.tflow: error: Configuration error: bad section"
        );
    }

    #[test]
    fn test_render_fancy_includes_snippet() {
        let err = compile_error();
        let report = render_error(&err, "x.tflow", ReportStyle::Fancy);
        assert!(report.contains("unexpected end of file"));
        assert!(report.contains("<process name='X'"));
        assert!(report.contains("close the tag"));
    }
}
