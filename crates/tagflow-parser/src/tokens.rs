//! Token definitions for the Tagflow markup.

use std::fmt;

use crate::span::{Location, Span};

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    TagOpen,  // <
    TagClose, // >
    Slash,    // /
    Assign,   // =

    // Literals
    StringLiteral,
    Identifier,

    // Keywords
    Process,
    Events,
    Subprocess,
    Col,
    /// One of the event type words; the literal text tells which.
    EventType,

    Eof,
}

impl TokenKind {
    /// Human readable description used in "expected ..." messages.
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::TagOpen => "`<`",
            TokenKind::TagClose => "`>`",
            TokenKind::Slash => "`/`",
            TokenKind::Assign => "`=`",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Process => "`process`",
            TokenKind::Events => "`events`",
            TokenKind::Subprocess => "`subprocess`",
            TokenKind::Col => "`col`",
            TokenKind::EventType => "event type",
            TokenKind::Eof => "end of file",
        }
    }

    /// Returns true for reserved words.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Process
                | TokenKind::Events
                | TokenKind::Subprocess
                | TokenKind::Col
                | TokenKind::EventType
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A token with its (bounded) text and position information.
///
/// For string literals `text` holds the content without the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    span: Span,
    location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, location: Location) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            location,
        }
    }

    /// The end-of-file token at `offset`.
    pub fn eof(offset: usize, location: Location) -> Self {
        Self::new(TokenKind::Eof, "", Span::new(offset..offset), location)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the token and returns its text.
    pub fn into_text(self) -> String {
        self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// How the token reads in an error message, e.g. `` `task` `` or `end of file`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => self.kind.description().to_string(),
            TokenKind::StringLiteral => format!("string '{}'", self.text),
            _ => format!("`{}`", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let location = Location::default();
        let eof = Token::eof(0, location);
        assert_eq!(eof.describe(), "end of file");

        let task = Token::new(TokenKind::EventType, "task", Span::new(1..5), location);
        assert_eq!(task.describe(), "`task`");

        let literal = Token::new(TokenKind::StringLiteral, "Demo", Span::new(0..6), location);
        assert_eq!(literal.describe(), "string 'Demo'");
    }

    #[test]
    fn test_keyword_kinds() {
        assert!(TokenKind::Col.is_keyword());
        assert!(TokenKind::EventType.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::Eof.is_keyword());
    }
}
