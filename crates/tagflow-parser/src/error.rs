//! Error and diagnostic system for the Tagflow compiler.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans for rich error context
//! - A 1-based row/column [`Location`](crate::Location) for `path:row:col` reports
//! - Severity levels
//!
//! # Overview
//!
//! Every failure is a single [`Diagnostic`]; compilation stops at the first
//! error. Warnings use the same type with [`Severity::Warning`] and are
//! returned alongside a successful compilation.
//!
//! # Example
//!
//! ```
//! # use tagflow_parser::error::{Diagnostic, ErrorCode};
//! # use tagflow_parser::{Location, Span};
//!
//! let diag = Diagnostic::error("event needs an `id` attribute")
//!     .with_code(ErrorCode::E200)
//!     .at(Location::new(3, 5))
//!     .with_label(Span::new(40..44), "missing `id`")
//!     .with_help("add `id='...'` to the tag");
//!
//! assert_eq!(diag.location().row(), 3);
//! ```

mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind};
pub use label::{Label, LabelStyle};
pub use severity::Severity;

/// A type alias for `Result<T, Diagnostic>`.
pub type Result<T> = std::result::Result<T, Diagnostic>;
