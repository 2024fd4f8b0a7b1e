//! Compiler settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tagflow_core::layout::LayoutConfig;

/// Default number of symbol table slots.
pub const DEFAULT_SYMBOL_CAPACITY: usize = 16384;

/// Largest accepted number of symbol table slots.
pub const MAX_SYMBOL_CAPACITY: usize = 1 << 20;

/// Largest accepted band height, in grid rows.
pub const MAX_ROWS_PER_SUBPROCESS: u32 = 64;

/// Largest accepted `min_columns`.
pub const MAX_MIN_COLUMNS: u32 = 4096;

/// Largest accepted column width or row height, in layout units.
pub const MAX_CELL_EXTENT: u32 = 100_000;

/// A setting outside the range the compiler can work with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{field}` is {value}, the largest accepted value is {max}")]
pub struct ConfigError {
    field: &'static str,
    value: u64,
    max: u64,
}

impl ConfigError {
    pub fn field(&self) -> &'static str {
        self.field
    }
}

fn check_limit(field: &'static str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError { field, value, max });
    }
    Ok(())
}

/// Default upper bound on the byte length of a single token.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 255;

/// What the scanner does with identifiers and string literals that exceed
/// the configured token length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenOverflow {
    /// Cut the token at the bound and record an `E003` warning.
    #[default]
    Truncate,
    /// Fail with an `E003` error.
    Reject,
}

/// Settings for a single compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompileConfig {
    symbol_capacity: usize,
    max_token_len: usize,
    token_overflow: TokenOverflow,
    layout: LayoutConfig,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            symbol_capacity: DEFAULT_SYMBOL_CAPACITY,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            token_overflow: TokenOverflow::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl CompileConfig {
    pub fn symbol_capacity(&self) -> usize {
        self.symbol_capacity
    }

    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    pub fn token_overflow(&self) -> TokenOverflow {
        self.token_overflow
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Sets the number of symbol table slots (rounded up to a power of two).
    pub fn with_symbol_capacity(mut self, capacity: usize) -> Self {
        self.symbol_capacity = capacity;
        self
    }

    /// Sets the token length bound. Values below one are raised to one.
    pub fn with_max_token_len(mut self, len: usize) -> Self {
        self.max_token_len = len.max(1);
        self
    }

    pub fn with_token_overflow(mut self, policy: TokenOverflow) -> Self {
        self.token_overflow = policy;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Checks that every setting is within the supported range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range setting as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        check_limit(
            "symbol_capacity",
            self.symbol_capacity as u64,
            MAX_SYMBOL_CAPACITY as u64,
        )?;
        check_limit(
            "rows_per_subprocess",
            layout.rows_per_subprocess().into(),
            MAX_ROWS_PER_SUBPROCESS.into(),
        )?;
        check_limit("min_columns", layout.min_columns().into(), MAX_MIN_COLUMNS.into())?;
        check_limit("column_width", layout.column_width().into(), MAX_CELL_EXTENT.into())?;
        check_limit("row_height", layout.row_height().into(), MAX_CELL_EXTENT.into())
    }
}
