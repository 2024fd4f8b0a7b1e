//! Tagflow - A tag markup language for business process diagrams.
//!
//! Compiles Tagflow documents into positioned diagrams: every event and
//! subprocess placed on a grid, every reference turned into an edge.

pub mod config;

mod error;
mod graph;

pub use tagflow_core::{geometry, identifier, layout, semantic};
pub use tagflow_parser::{Compilation, error as diagnostics};

pub use error::TagflowError;
pub use graph::ProcessGraph;

use std::{fs, path::Path};

use log::{debug, info, warn};

use config::AppConfig;

/// Compiles Tagflow sources with a fixed configuration.
///
/// # Examples
///
/// ```rust
/// use tagflow::{Compiler, config::AppConfig};
///
/// let source = "<process name='Demo'></process>";
///
/// let compiler = Compiler::new(AppConfig::default());
/// let compilation = compiler.compile(source).expect("Failed to compile");
/// assert_eq!(compilation.diagram().title(), "Demo");
///
/// // Or use the default config
/// let compiler = Compiler::default();
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    config: AppConfig,
}

impl Compiler {
    /// Create a new compiler with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Compiler limits and grid layout settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Compile source text into a positioned diagram.
    ///
    /// Warnings are kept on the returned [`Compilation`] for the caller to
    /// report.
    ///
    /// # Errors
    ///
    /// Returns [`TagflowError::Config`] when the configuration is out of
    /// range, otherwise [`TagflowError::Compile`] with the first lexical,
    /// syntax or semantic diagnostic.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagflow::Compiler;
    ///
    /// let err = Compiler::default().compile("<process name='X'").unwrap_err();
    /// assert!(err.diagnostic().is_some());
    /// ```
    pub fn compile(&self, source: &str) -> Result<Compilation, TagflowError> {
        info!("Compiling process document");

        let config = self.config.compile_config();
        config
            .validate()
            .map_err(|err| TagflowError::Config(err.to_string()))?;

        let compilation = tagflow_parser::compile(source, config)
            .map_err(|diagnostic| TagflowError::new_compile_error(diagnostic, source))?;

        debug!(
            objects = compilation.diagram().objects().len(),
            edges = compilation.diagram().edges().len(),
            warnings = compilation.warnings().len();
            "Process compiled successfully"
        );

        Ok(compilation)
    }

    /// Read `path` and compile its contents.
    ///
    /// # Errors
    ///
    /// Returns [`TagflowError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`Compiler::compile`] with the path attached.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<Compilation, TagflowError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading source file");

        let source = fs::read_to_string(path)?;
        self.compile(&source).map_err(|err| err.with_path(path))
    }

    /// Logs flow problems found in a compiled diagram: events no starter
    /// reaches and references that did not resolve.
    ///
    /// Returns the number of problems reported.
    pub fn check_flow(&self, compilation: &Compilation) -> usize {
        let diagram = compilation.diagram();
        let graph = ProcessGraph::new(diagram);

        let unreachable = graph.unreachable_events();
        for id in &unreachable {
            if let Some(object) = diagram.object(*id) {
                let symbol = object.symbol();
                warn!(
                    object:% = id,
                    subprocess = symbol.namespace().unwrap_or_default(),
                    event = symbol.local_name();
                    "Event is not reachable from any starter"
                );
            }
        }
        for target in diagram.unresolved() {
            warn!(
                from:% = target.from(),
                target = target.target().as_str(),
                slot:% = target.slot();
                "Reference does not name any event"
            );
        }
        if graph.is_cyclic() {
            info!("Process flow contains a loop");
        }

        unreachable.len() + diagram.unresolved().len()
    }
}
