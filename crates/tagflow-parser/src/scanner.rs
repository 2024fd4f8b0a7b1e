//! Lexical analyzer for Tagflow markup.
//!
//! The [`Scanner`] produces one [`Token`] per call to
//! [`Scanner::next_token`]. Token shapes are recognised with `winnow`
//! combinators over a [`LocatingSlice`]; the scanner itself keeps track of
//! the 1-based row and column for diagnostics and applies the configured
//! [`TokenOverflow`] policy to overlong identifiers and string literals.
//!
//! Scanning stops at the first error. Once the input is exhausted every
//! further call returns an [`TokenKind::Eof`] token.

use log::{trace, warn};
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, preceded, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location as _},
    token::{one_of, take_while},
};

use crate::{
    config::{CompileConfig, TokenOverflow},
    error::{Diagnostic, ErrorCode},
    keywords::KeywordTable,
    span::{Location, Span},
    tokens::{Token, TokenKind},
};

type Input<'a> = LocatingSlice<&'a str>;

/// A recognised token shape before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme<'a> {
    Punct(TokenKind),
    Literal(&'a str),
    Word(&'a str),
}

/// Blank characters skipped between tokens.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

fn blanks<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(0.., is_blank).parse_next(input)
}

fn punctuation(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        '<'.value(TokenKind::TagOpen),
        '>'.value(TokenKind::TagClose),
        '/'.value(TokenKind::Slash),
        '='.value(TokenKind::Assign),
    ))
    .parse_next(input)
}

/// `'...'` on a single line, no escapes. Commits after the opening quote.
fn string_literal<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    preceded(
        '\'',
        cut_err(terminated(
            take_while(0.., |c: char| c != '\'' && c != '\n'),
            '\'',
        )),
    )
    .parse_next(input)
}

/// ASCII letter followed by ASCII alphanumerics or `_`.
fn word<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

fn lexeme<'a>(input: &mut Input<'a>) -> ModalResult<Lexeme<'a>> {
    alt((
        punctuation.map(Lexeme::Punct),
        string_literal.map(Lexeme::Literal),
        word.map(Lexeme::Word),
    ))
    .parse_next(input)
}

/// Returns the longest prefix of `text` that fits in `max` bytes and ends
/// on a character boundary.
fn truncate_at_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

/// Pull-based tokenizer over a borrowed source text.
#[derive(Debug)]
pub struct Scanner<'src> {
    source: &'src str,
    input: Input<'src>,
    location: Location,
    keywords: KeywordTable,
    max_token_len: usize,
    overflow: TokenOverflow,
    warnings: Vec<Diagnostic>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str, config: &CompileConfig) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source),
            location: Location::default(),
            keywords: KeywordTable::new(),
            max_token_len: config.max_token_len(),
            overflow: config.token_overflow(),
            warnings: Vec::new(),
        }
    }

    /// Location of the next unread character.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Warnings recorded so far (truncated tokens).
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Consumes the scanner and returns the recorded warnings.
    pub fn into_warnings(self) -> Vec<Diagnostic> {
        self.warnings
    }

    /// Scans the next token.
    ///
    /// # Errors
    ///
    /// - `E001` for a string literal not closed on the same line, located at
    ///   the opening quote.
    /// - `E002` for a character that cannot start a token.
    /// - `E003` for an overlong token when the overflow policy is
    ///   [`TokenOverflow::Reject`].
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_blanks();

        let start = self.input.current_token_start();
        let location = self.location;

        if self.input.is_empty() {
            trace!(offset = start; "End of input");
            return Ok(Token::eof(start, location));
        }

        let lexeme =
            lexeme(&mut self.input).map_err(|err| self.lex_error(err, start, location))?;

        let end = self.input.current_token_start();
        let span = Span::new(start..end);
        self.location = location.advance(&self.source[start..end]);

        let token = match lexeme {
            Lexeme::Punct(kind) => Token::new(kind, &self.source[start..end], span, location),
            Lexeme::Literal(content) => {
                let content = self.bounded(content, span, location)?;
                Token::new(TokenKind::StringLiteral, content, span, location)
            }
            Lexeme::Word(text) => {
                let text = self.bounded(text, span, location)?;
                let kind = self.keywords.classify(text);
                Token::new(kind, text, span, location)
            }
        };

        trace!(
            kind:? = token.kind(),
            text = token.text(),
            row = location.row(),
            col = location.col();
            "Scanned token"
        );
        Ok(token)
    }

    fn skip_blanks(&mut self) {
        if let Ok(skipped) = blanks(&mut self.input) {
            self.location = self.location.advance(skipped);
        }
    }

    /// Applies the overflow policy to token text.
    fn bounded<'t>(
        &mut self,
        text: &'t str,
        span: Span,
        location: Location,
    ) -> Result<&'t str, Diagnostic> {
        if text.len() <= self.max_token_len {
            return Ok(text);
        }

        let message = format!(
            "token is {} bytes long, the limit is {}",
            text.len(),
            self.max_token_len
        );

        match self.overflow {
            TokenOverflow::Reject => Err(Diagnostic::error(message)
                .with_code(ErrorCode::E003)
                .at(location)
                .with_label(span, ErrorCode::E003.description())
                .with_help("shorten the identifier or string")),
            TokenOverflow::Truncate => {
                let kept = truncate_at_boundary(text, self.max_token_len);
                warn!(
                    row = location.row(),
                    col = location.col(),
                    len = text.len(),
                    kept = kept.len();
                    "Truncated overlong token"
                );
                self.warnings.push(
                    Diagnostic::warning(format!("{message}; truncated"))
                        .with_code(ErrorCode::E003)
                        .at(location)
                        .with_label(span, ErrorCode::E003.description()),
                );
                Ok(kept)
            }
        }
    }

    /// Converts a failed recognition into a diagnostic.
    fn lex_error(
        &self,
        err: ErrMode<ContextError>,
        start: usize,
        location: Location,
    ) -> Diagnostic {
        match err {
            ErrMode::Cut(_) => {
                let line_end = self.source[start..]
                    .find('\n')
                    .map_or(self.source.len(), |offset| start + offset);
                Diagnostic::error("unterminated string literal")
                    .with_code(ErrorCode::E001)
                    .at(location)
                    .with_label(Span::new(start..line_end), "string starts here")
                    .with_help("add a closing `'` on the same line")
            }
            ErrMode::Backtrack(_) | ErrMode::Incomplete(_) => {
                let found = self.source[start..].chars().next().unwrap_or('\0');
                let span = Span::new(start..start + found.len_utf8());
                Diagnostic::error(format!("invalid character `{}`", found.escape_debug()))
                    .with_code(ErrorCode::E002)
                    .at(location)
                    .with_label(span, ErrorCode::E002.description())
            }
        }
    }
}
