//! Source spans attached to a diagnostic.

use crate::span::Span;

/// Whether a label marks the offending token or only adds context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Primary,
    Secondary,
}

/// A message pinned to a byte range of the source.
///
/// A diagnostic usually carries one primary label on the token it is about.
/// Secondary labels point back at related text, e.g. the opening tag of a
/// mismatched close or the first copy of a duplicated attribute.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    style: LabelStyle,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(LabelStyle::Primary, span, message)
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::new(LabelStyle::Secondary, span, message)
    }

    fn new(style: LabelStyle, span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn style(&self) -> LabelStyle {
        self.style
    }

    pub fn is_primary(&self) -> bool {
        self.style == LabelStyle::Primary
    }

    pub fn is_secondary(&self) -> bool {
        self.style == LabelStyle::Secondary
    }
}
