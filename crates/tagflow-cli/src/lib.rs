//! Tagflow CLI library
//!
//! This module contains the core CLI logic for the Tagflow process compiler.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, ReportStyle};

use std::{fs, io};

use log::info;

use tagflow::{Compilation, Compiler, TagflowError};

/// Run the Tagflow CLI application
///
/// Compiles the input file, logs flow warnings and, when an output path is
/// given, writes the compiled diagram as TOML.
///
/// # Errors
///
/// Returns `TagflowError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Compile errors
pub fn run(args: &Args) -> Result<Compilation, TagflowError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Processing document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let compiler = Compiler::new(app_config);
    let compilation = compiler.compile_file(&args.input)?;
    compiler.check_flow(&compilation);

    if let Some(output) = &args.output {
        let serialized = toml::to_string(compilation.diagram()).map_err(io::Error::other)?;
        fs::write(output, serialized)?;
        info!(output_file = output.as_str(); "Diagram exported successfully");
    }

    Ok(compilation)
}
