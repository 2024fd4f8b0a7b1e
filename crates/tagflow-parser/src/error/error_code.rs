//! Error codes for the Tagflow diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexical errors
//! - `E1xx` - Syntax errors
//! - `E2xx` - Semantic errors
//! - `E3xx` - Capacity errors (reported as semantic errors)

use std::fmt;

/// Broad class of a diagnostic, following the compiler phase that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Syntax,
    Semantic,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Semantic => write!(f, "semantic error"),
        }
    }
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A `'` was opened but the line or the file ended before the closing quote.
    E001,

    /// Invalid character.
    ///
    /// A character that cannot start any token.
    E002,

    /// Token too long.
    ///
    /// A string literal or identifier exceeds the configured byte bound.
    /// Reported as a warning when the overflow policy truncates.
    E003,

    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Unexpected end of file.
    E101,

    // =========================================================================
    // Semantic Errors (E2xx)
    // =========================================================================
    /// Missing required attribute.
    E200,

    /// Attribute not allowed on this tag.
    E201,

    /// Invalid attribute value.
    ///
    /// For example a `row` that is not one of `up`, `mid` or `down`.
    E202,

    /// Unknown event type.
    E203,

    /// Too many events in a column.
    ///
    /// A `<col>` block holds at most three events.
    E204,

    /// Duplicate attribute on the same tag.
    E205,

    /// Too many targets.
    ///
    /// Gateways accept up to three targets, every other event exactly one.
    E206,

    /// Conflicting gateway targets.
    ///
    /// A slot was given both positionally through `points` and by name.
    E207,

    // =========================================================================
    // Capacity Errors (E3xx)
    // =========================================================================
    /// Symbol table full.
    E300,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
            ErrorCode::E300 => "E300",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "invalid character",
            ErrorCode::E003 => "token too long",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of file",
            ErrorCode::E200 => "missing attribute",
            ErrorCode::E201 => "unknown attribute",
            ErrorCode::E202 => "invalid attribute value",
            ErrorCode::E203 => "unknown event type",
            ErrorCode::E204 => "too many events in column",
            ErrorCode::E205 => "duplicate attribute",
            ErrorCode::E206 => "too many targets",
            ErrorCode::E207 => "conflicting targets",
            ErrorCode::E300 => "symbol table full",
        }
    }

    /// Returns the class of error this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E001 | ErrorCode::E002 | ErrorCode::E003 => ErrorKind::Lex,
            ErrorCode::E100 | ErrorCode::E101 => ErrorKind::Syntax,
            ErrorCode::E200
            | ErrorCode::E201
            | ErrorCode::E202
            | ErrorCode::E203
            | ErrorCode::E204
            | ErrorCode::E205
            | ErrorCode::E206
            | ErrorCode::E207
            | ErrorCode::E300 => ErrorKind::Semantic,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
