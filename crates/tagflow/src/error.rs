//! Error types for Tagflow operations.
//!
//! This module provides the main error type [`TagflowError`] which wraps
//! the failures that can occur while loading and compiling a document.

use std::{io, path::PathBuf};

use thiserror::Error;

use tagflow_parser::error::Diagnostic;

/// The main error type for Tagflow operations.
///
/// # Diagnostic Variants
///
/// The `Compile` variant carries the compiler [`Diagnostic`] together with
/// the source text it points into, so callers can render a snippet.
#[derive(Debug, Error)]
pub enum TagflowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{diagnostic}")]
    Compile {
        diagnostic: Diagnostic,
        path: Option<PathBuf>,
        src: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TagflowError {
    /// Create a new `Compile` error with the associated source code.
    pub fn new_compile_error(diagnostic: Diagnostic, src: impl Into<String>) -> Self {
        Self::Compile {
            diagnostic,
            path: None,
            src: src.into(),
        }
    }

    /// Attach the path of the file that failed to compile.
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            Self::Compile {
                diagnostic, src, ..
            } => Self::Compile {
                diagnostic,
                path: Some(file.into()),
                src,
            },
            other => other,
        }
    }

    /// Returns the compiler diagnostic, if this is a compile failure.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Compile { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}
