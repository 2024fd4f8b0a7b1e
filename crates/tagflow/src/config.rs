//! Configuration types for Tagflow compilation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining compiler and layout settings.
//! - [`CompilerConfig`] - Symbol table size and token length policy.
//! - [`LayoutConfig`] - Grid dimensions used when positioning objects.
//!
//! # Example
//!
//! ```
//! # use tagflow::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.compiler().symbol_capacity(), 16384);
//! assert_eq!(config.layout().rows_per_subprocess(), 3);
//! ```

use serde::Deserialize;

pub use tagflow_core::layout::LayoutConfig;
pub use tagflow_parser::TokenOverflow;

use tagflow_parser::{CompileConfig, DEFAULT_MAX_TOKEN_LEN, DEFAULT_SYMBOL_CAPACITY};

/// Top-level application configuration.
///
/// Maps to the `[compiler]` and `[layout]` sections of a config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Compiler configuration section.
    #[serde(default)]
    compiler: CompilerConfig,

    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its two sections.
    pub fn new(compiler: CompilerConfig, layout: LayoutConfig) -> Self {
        Self { compiler, layout }
    }

    pub fn compiler(&self) -> &CompilerConfig {
        &self.compiler
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Flattens both sections into the settings of a single compilation.
    pub fn compile_config(&self) -> CompileConfig {
        CompileConfig::default()
            .with_symbol_capacity(self.compiler.symbol_capacity)
            .with_max_token_len(self.compiler.max_token_len)
            .with_token_overflow(self.compiler.token_overflow)
            .with_layout(self.layout)
    }
}

/// Compiler limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Number of symbol table slots; rounded up to a power of two.
    symbol_capacity: usize,

    /// Longest identifier or string literal, in bytes.
    max_token_len: usize,

    /// What to do with tokens longer than `max_token_len`.
    token_overflow: TokenOverflow,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            symbol_capacity: DEFAULT_SYMBOL_CAPACITY,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
            token_overflow: TokenOverflow::default(),
        }
    }
}

impl CompilerConfig {
    /// Creates a new [`CompilerConfig`].
    ///
    /// # Arguments
    ///
    /// * `symbol_capacity` - Number of symbol table slots.
    /// * `max_token_len` - Longest accepted token, in bytes.
    /// * `token_overflow` - Policy for tokens over the limit.
    pub fn new(symbol_capacity: usize, max_token_len: usize, token_overflow: TokenOverflow) -> Self {
        Self {
            symbol_capacity,
            max_token_len,
            token_overflow,
        }
    }

    pub fn symbol_capacity(&self) -> usize {
        self.symbol_capacity
    }

    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    pub fn token_overflow(&self) -> TokenOverflow {
        self.token_overflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [compiler]
            token_overflow = "reject"

            [layout]
            min_columns = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.compiler().token_overflow(), TokenOverflow::Reject);
        assert_eq!(config.compiler().symbol_capacity(), DEFAULT_SYMBOL_CAPACITY);
        assert_eq!(config.layout().min_columns(), 4);
        assert_eq!(config.layout().column_width(), 150);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.compile_config(), CompileConfig::default());
    }

    #[test]
    fn test_compile_config_carries_every_field() {
        let config = AppConfig::new(
            CompilerConfig::new(64, 32, TokenOverflow::Reject),
            LayoutConfig::default().with_rows_per_subprocess(5),
        );
        let compile = config.compile_config();

        assert_eq!(compile.symbol_capacity(), 64);
        assert_eq!(compile.max_token_len(), 32);
        assert_eq!(compile.token_overflow(), TokenOverflow::Reject);
        assert_eq!(compile.layout().rows_per_subprocess(), 5);
    }

    #[test]
    fn test_oversized_layout_values_fail_validation() {
        let config: AppConfig = toml::from_str("[layout]\ncolumn_width = 4000000000").unwrap();
        let err = config.compile_config().validate().unwrap_err();
        assert_eq!(err.field(), "column_width");

        let config: AppConfig = toml::from_str("[layout]\nrows_per_subprocess = 100000").unwrap();
        let err = config.compile_config().validate().unwrap_err();
        assert_eq!(err.field(), "rows_per_subprocess");
    }

    #[test]
    fn test_oversized_capacity_fails_validation() {
        let config: AppConfig =
            toml::from_str("[compiler]\nsymbol_capacity = 9223372036854775807").unwrap();
        let err = config.compile_config().validate().unwrap_err();
        assert_eq!(err.field(), "symbol_capacity");
    }

    #[test]
    fn test_unknown_overflow_policy_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[compiler]\ntoken_overflow = \"drop\"");
        assert!(result.is_err());
    }
}
