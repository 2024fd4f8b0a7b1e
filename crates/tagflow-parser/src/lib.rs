//! # Tagflow Parser
//!
//! Compiler front end for the Tagflow process markup. This crate turns
//! source text into a positioned [`Diagram`] and the symbol table it was
//! built from.
//!
//! ## Usage
//!
//! ```
//! # use tagflow_parser::{compile, CompileConfig, error::Diagnostic};
//!
//! fn main() -> Result<(), Diagnostic> {
//!     let source = "
//!         <process name='Demo'>
//!           <subprocess id='s1'>
//!             <events>
//!               <starter id='a' points='b'/>
//!               <task id='b' name='Do X'/>
//!             </events>
//!           </subprocess>
//!         </process>";
//!
//!     let compilation = compile(source, CompileConfig::default())?;
//!     assert_eq!(compilation.diagram().edges().len(), 1);
//!     Ok(())
//! }
//! ```

mod attributes;
mod config;
pub mod error;
mod keywords;
mod parser;
mod resolve;
mod rules;
mod scanner;
mod span;
mod symbol_table;
mod tokens;

pub use config::{
    CompileConfig, ConfigError, DEFAULT_MAX_TOKEN_LEN, DEFAULT_SYMBOL_CAPACITY,
    MAX_CELL_EXTENT, MAX_MIN_COLUMNS, MAX_ROWS_PER_SUBPROCESS, MAX_SYMBOL_CAPACITY, TokenOverflow,
};
pub use keywords::KeywordTable;
pub use parser::MAX_EVENTS_PER_COLUMN;
pub use scanner::Scanner;
pub use span::{Location, Span};
pub use symbol_table::{
    EventSymbol, SubprocessSymbol, Symbol, SymbolTable, SymbolTableError, hash_key,
};
pub use tokens::{Token, TokenKind};

use log::info;

use tagflow_core::{identifier::QualifiedName, layout::{Diagram, ObjectId}};

use error::Diagnostic;
use parser::Parser;

/// The result of a successful compilation. Read-only.
#[derive(Debug, Clone)]
pub struct Compilation {
    diagram: Diagram,
    symbols: SymbolTable,
    warnings: Vec<Diagnostic>,
}

impl Compilation {
    pub(crate) fn new(diagram: Diagram, symbols: SymbolTable, warnings: Vec<Diagnostic>) -> Self {
        Self {
            diagram,
            symbols,
            warnings,
        }
    }

    /// Positioned objects, resolved edges and grid size.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Non-fatal diagnostics such as truncated tokens and redefined symbols.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Looks up the symbol a layout object was created for.
    pub fn symbol_for(&self, id: ObjectId) -> Option<(&QualifiedName, &Symbol)> {
        self.symbols.find_by_object(id)
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }
}

/// Compile source text into a positioned diagram.
///
/// This is the main entry point of the crate. It runs the pipeline:
///
/// 1. **Scan** - Split the source into tokens, classifying keywords
/// 2. **Parse** - Check the grammar, validate attributes, fill the symbol
///    table and lay out objects on the grid
/// 3. **Resolve** - Turn event targets into edges and size the grid
///
/// # Errors
///
/// Returns the first lexical, syntax or semantic [`Diagnostic`], or an
/// uncoded error diagnostic when `config` fails [`CompileConfig::validate`].
/// Dangling targets are not errors; see [`Diagram::unresolved`].
pub fn compile(source: &str, config: CompileConfig) -> Result<Compilation, Diagnostic> {
    info!(bytes = source.len(); "Compiling document");

    config.validate().map_err(|err| {
        Diagnostic::error(format!("invalid configuration: {err}"))
            .with_help("lower the setting in the compiler configuration")
    })?;

    let document = Parser::new(source, &config)?.parse()?;
    let compilation = resolve::resolve(document, config.layout());

    info!(
        objects = compilation.diagram().objects().len(),
        warnings = compilation.warnings().len();
        "Compilation finished"
    );
    Ok(compilation)
}
