//! Recursive-descent parser for Tagflow markup.
//!
//! The [`Parser`] pulls tokens from a [`Scanner`] with one token of
//! lookahead. Attributes are read into an [`AttributeBag`] and validated
//! by [`rules`] once the tag is complete. Every declared subprocess and event
//! is written to the [`SymbolTable`] and gets a [`LayoutObject`] whose grid
//! cell follows from its subprocess band and column.
//!
//! ```text
//! Program       := ProcessHeader Subprocess* '<' '/' 'process' '>' EOF
//! ProcessHeader := '<' 'process' Attrs '>'
//! Subprocess    := '<' 'subprocess' Attrs '>' Events '<' '/' 'subprocess' '>'
//! Events        := '<' 'events' '>' (Event | Column)* '<' '/' 'events' '>'
//! Column        := '<' 'col' '>' Event{0,3} '<' '/' 'col' '>'
//! Event         := '<' EventType Attrs ( '/' '>' | '>' '<' '/' EventType? '>' )
//! Attrs         := (Identifier '=' StringLiteral)*
//! ```
//!
//! Parsing stops at the first error.

use log::{debug, info, warn};

use tagflow_core::{
    geometry::GridRect,
    identifier::QualifiedName,
    layout::{LayoutConfig, LayoutObject, ObjectId, ObjectKind, event_size},
    semantic::{EventKind, RowSlot},
};

use crate::{
    attributes::{Attribute, AttributeBag},
    config::CompileConfig,
    error::{Diagnostic, ErrorCode},
    rules,
    scanner::Scanner,
    symbol_table::{EventSymbol, SubprocessSymbol, Symbol, SymbolTable, SymbolTableError},
    tokens::{Token, TokenKind},
};

/// Maximum number of events sharing one `<col>`.
pub const MAX_EVENTS_PER_COLUMN: usize = 3;

/// Everything the parser produced, before references are resolved.
#[derive(Debug)]
pub(crate) struct ParsedDocument {
    pub title: String,
    pub symbols: SymbolTable,
    pub objects: Vec<LayoutObject>,
    pub subprocess_count: u32,
    /// Largest number of columns used by any subprocess.
    pub widest_columns: u32,
    pub warnings: Vec<Diagnostic>,
}

/// Owned compilation context: scanner, lookahead, symbol table and objects.
#[derive(Debug)]
pub(crate) struct Parser<'src> {
    scanner: Scanner<'src>,
    current: Token,
    symbols: SymbolTable,
    objects: Vec<LayoutObject>,
    layout: LayoutConfig,
    subprocess_count: u32,
    widest_columns: u32,
    warnings: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    /// Creates a parser and reads the first token.
    pub fn new(source: &'src str, config: &CompileConfig) -> Result<Self, Diagnostic> {
        let mut scanner = Scanner::new(source, config);
        let current = scanner.next_token()?;
        Ok(Self {
            scanner,
            current,
            symbols: SymbolTable::with_capacity(config.symbol_capacity()),
            objects: Vec::new(),
            layout: *config.layout(),
            subprocess_count: 0,
            widest_columns: 0,
            warnings: Vec::new(),
        })
    }

    /// Parses a whole document.
    pub fn parse(mut self) -> Result<ParsedDocument, Diagnostic> {
        let title = self.parse_document()?;

        info!(
            title = title.as_str(),
            subprocesses = self.subprocess_count,
            objects = self.objects.len(),
            symbols = self.symbols.len();
            "Parsed document"
        );

        let mut warnings = self.scanner.into_warnings();
        warnings.append(&mut self.warnings);

        Ok(ParsedDocument {
            title,
            symbols: self.symbols,
            objects: self.objects,
            subprocess_count: self.subprocess_count,
            widest_columns: self.widest_columns,
            warnings,
        })
    }

    /// Advances to the next token and returns the previous one.
    fn bump(&mut self) -> Result<Token, Diagnostic> {
        let next = self.scanner.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Consumes the current token if it has `kind`.
    fn expect(&mut self, kind: TokenKind) -> Result<Token, Diagnostic> {
        if self.current.is(kind) {
            self.bump()
        } else {
            Err(self.unexpected(kind.description()))
        }
    }

    /// A syntax error at the current token.
    fn unexpected(&self, expected: &str) -> Diagnostic {
        let found = &self.current;
        let code = if found.is(TokenKind::Eof) {
            ErrorCode::E101
        } else {
            ErrorCode::E100
        };
        let message = if found.is(TokenKind::Eof) {
            format!("unexpected end of file, expected {expected}")
        } else {
            format!("expected {expected}, found {}", found.describe())
        };
        Diagnostic::error(message)
            .with_code(code)
            .at(found.location())
            .with_label(found.span(), format!("expected {expected}"))
    }

    fn parse_document(&mut self) -> Result<String, Diagnostic> {
        self.expect(TokenKind::TagOpen)?;
        let tag = self.expect(TokenKind::Process)?;
        let bag = self.parse_attributes()?;
        self.expect(TokenKind::TagClose)?;
        let title = rules::process_title(&tag, &bag)?;
        debug!(title = title.as_str(); "Process header");

        loop {
            self.expect(TokenKind::TagOpen)?;
            match self.current.kind() {
                TokenKind::Subprocess => self.parse_subprocess()?,
                TokenKind::Slash => {
                    self.bump()?;
                    self.expect(TokenKind::Process)?;
                    self.expect(TokenKind::TagClose)?;
                    break;
                }
                _ => return Err(self.unexpected("`subprocess` or `/`")),
            }
        }

        self.expect(TokenKind::Eof)?;
        Ok(title)
    }

    /// Parses a subprocess after its `<`.
    fn parse_subprocess(&mut self) -> Result<(), Diagnostic> {
        let tag = self.expect(TokenKind::Subprocess)?;
        let bag = self.parse_attributes()?;
        self.expect(TokenKind::TagClose)?;
        let header = rules::subprocess_header(&tag, &bag)?;

        let band_row = self
            .subprocess_count
            .saturating_mul(self.layout.rows_per_subprocess());
        self.subprocess_count += 1;

        let key = QualifiedName::verbatim(header.id());
        let superseded = self.define(&key, SubprocessSymbol::new(header.display_name()), &tag)?;
        let rect = GridRect::new(0, band_row, self.layout.band_size(self.layout.min_columns()));
        let object = LayoutObject::new(key.clone(), ObjectKind::Subprocess, rect)
            .with_label(header.display_name());
        let id = self.place_object(&key, object, superseded, &tag)?;
        debug!(key = key.as_str(), object:% = id, band_row; "Subprocess declared");

        self.expect(TokenKind::TagOpen)?;
        self.expect(TokenKind::Events)?;
        self.expect(TokenKind::TagClose)?;
        let columns = self.parse_events(header.id(), band_row)?;
        self.widest_columns = self.widest_columns.max(columns);

        self.expect(TokenKind::TagOpen)?;
        self.expect(TokenKind::Slash)?;
        self.expect(TokenKind::Subprocess)?;
        self.expect(TokenKind::TagClose)?;
        Ok(())
    }

    /// Parses the body of `<events>` up to and including `</events>`.
    /// Returns the number of columns used.
    fn parse_events(&mut self, namespace: &str, band_row: u32) -> Result<u32, Diagnostic> {
        let mut column = 0;
        loop {
            self.expect(TokenKind::TagOpen)?;
            match self.current.kind() {
                TokenKind::Slash => {
                    self.bump()?;
                    self.expect(TokenKind::Events)?;
                    self.expect(TokenKind::TagClose)?;
                    return Ok(column);
                }
                TokenKind::Col => {
                    self.bump()?;
                    self.expect(TokenKind::TagClose)?;
                    self.parse_column(namespace, band_row, column)?;
                    column += 1;
                }
                TokenKind::EventType | TokenKind::Identifier => {
                    self.parse_event(namespace, band_row, column)?;
                    column += 1;
                }
                _ => return Err(self.unexpected("an event, `col` or `/`")),
            }
        }
    }

    /// Parses the body of `<col>` up to and including `</col>`.
    fn parse_column(
        &mut self,
        namespace: &str,
        band_row: u32,
        column: u32,
    ) -> Result<(), Diagnostic> {
        let mut count = 0;
        loop {
            self.expect(TokenKind::TagOpen)?;
            match self.current.kind() {
                TokenKind::Slash => {
                    self.bump()?;
                    self.expect(TokenKind::Col)?;
                    self.expect(TokenKind::TagClose)?;
                    return Ok(());
                }
                TokenKind::EventType | TokenKind::Identifier => {
                    if count == MAX_EVENTS_PER_COLUMN {
                        return Err(Diagnostic::error(format!(
                            "too many events in column, at most {MAX_EVENTS_PER_COLUMN} are allowed"
                        ))
                        .with_code(ErrorCode::E204)
                        .at(self.current.location())
                        .with_label(self.current.span(), "one event too many")
                        .with_help("move this event into its own column"));
                    }
                    self.parse_event(namespace, band_row, column)?;
                    count += 1;
                }
                _ => return Err(self.unexpected("an event or `/`")),
            }
        }
    }

    /// Parses an event after its `<` and places it in `column`.
    fn parse_event(
        &mut self,
        namespace: &str,
        band_row: u32,
        column: u32,
    ) -> Result<(), Diagnostic> {
        let tag = self.bump()?;
        rules::event_kind(&tag)?;
        let bag = self.parse_attributes()?;
        self.parse_event_close(&tag)?;

        let decl = rules::event_decl(&tag, &bag, namespace)?;
        let (kind, id, title, row, targets) = decl.into_parts();

        let key = QualifiedName::qualify(namespace, &id);
        let row_offset = match kind {
            EventKind::Gateway | EventKind::End => RowSlot::Mid.offset(),
            _ => row.offset(),
        }
        .min(self.layout.rows_per_subprocess().saturating_sub(1));
        let rect = GridRect::new(column, band_row.saturating_add(row_offset), event_size(kind));

        let superseded = self.define(&key, EventSymbol::new(kind, title.as_str(), targets), &tag)?;
        let object =
            LayoutObject::new(key.clone(), ObjectKind::Event(kind), rect).with_label(title);
        let object_id = self.place_object(&key, object, superseded, &tag)?;

        debug!(
            key = key.as_str(),
            kind:% = kind,
            object:% = object_id,
            col = rect.col(),
            row = rect.row();
            "Event declared"
        );
        Ok(())
    }

    /// Consumes `/>` or `>` `</` [EventType] `>`.
    fn parse_event_close(&mut self, tag: &Token) -> Result<(), Diagnostic> {
        match self.current.kind() {
            TokenKind::Slash => {
                self.bump()?;
                self.expect(TokenKind::TagClose)?;
            }
            TokenKind::TagClose => {
                self.bump()?;
                self.expect(TokenKind::TagOpen)?;
                self.expect(TokenKind::Slash)?;
                if self.current.is(TokenKind::EventType) || self.current.is(TokenKind::Identifier) {
                    if self.current.text() != tag.text() {
                        let expected = format!("`{}`", tag.text());
                        return Err(self
                            .unexpected(&expected)
                            .with_secondary_label(tag.span(), "opened here"));
                    }
                    self.bump()?;
                }
                self.expect(TokenKind::TagClose)?;
            }
            kind => {
                let diagnostic = self.unexpected("`/>` or `>`");
                return Err(if kind.is_keyword() {
                    diagnostic.with_help(format!(
                        "`{}` is a reserved word and cannot name an attribute",
                        self.current.text()
                    ))
                } else {
                    diagnostic
                });
            }
        }
        Ok(())
    }

    /// Reads `name='value'` pairs until the next non-identifier token.
    fn parse_attributes(&mut self) -> Result<AttributeBag, Diagnostic> {
        let mut bag = AttributeBag::new();
        while self.current.is(TokenKind::Identifier) {
            let name = self.bump()?;
            self.expect(TokenKind::Assign)?;
            let value = self.expect(TokenKind::StringLiteral)?;
            bag.insert(Attribute::new(name, value));
        }
        Ok(bag)
    }

    /// Stores `symbol` under `key`. A redefinition replaces the earlier
    /// symbol, is reported as a warning, and returns the object the earlier
    /// symbol was bound to.
    fn define(
        &mut self,
        key: &QualifiedName,
        symbol: impl Into<Symbol>,
        tag: &Token,
    ) -> Result<Option<ObjectId>, Diagnostic> {
        match self.symbols.put(key.clone(), symbol) {
            Ok(None) => Ok(None),
            Ok(Some(previous)) => {
                warn!(key = key.as_str(), row = tag.location().row(); "Symbol redefined");
                self.warnings.push(
                    Diagnostic::warning(format!(
                        "`{key}` is defined more than once; the last definition wins"
                    ))
                    .at(tag.location())
                    .with_label(tag.span(), "redefined here"),
                );
                Ok(previous.object_id())
            }
            Err(err) => Err(self.table_error(err, tag)),
        }
    }

    /// Stores `object` and binds it to the symbol under `key`.
    ///
    /// The object of a superseded definition is overwritten in place, so
    /// every object in the diagram stays bound to exactly one symbol.
    fn place_object(
        &mut self,
        key: &QualifiedName,
        object: LayoutObject,
        superseded: Option<ObjectId>,
        tag: &Token,
    ) -> Result<ObjectId, Diagnostic> {
        let id = match superseded.filter(|id| id.index() < self.objects.len()) {
            Some(id) => {
                debug!(key = key.as_str(), object:% = id; "Replacing superseded object");
                self.objects[id.index()] = object;
                id
            }
            None => {
                let id = ObjectId::new(self.objects.len());
                self.objects.push(object);
                id
            }
        };
        self.symbols
            .bind_object(key, id)
            .map_err(|err| self.table_error(err, tag))?;
        Ok(id)
    }

    fn table_error(&self, err: SymbolTableError, tag: &Token) -> Diagnostic {
        let diagnostic = Diagnostic::error(err.to_string())
            .at(tag.location())
            .with_label(tag.span(), "declared here");
        match err {
            SymbolTableError::CapacityExceeded { .. } => diagnostic
                .with_code(ErrorCode::E300)
                .with_help("raise `symbol_capacity` in the compiler configuration"),
            SymbolTableError::NotFound(_) | SymbolTableError::AlreadyBound { .. } => diagnostic,
        }
    }
}
