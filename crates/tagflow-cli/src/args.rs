//! Command-line argument definitions for the Tagflow CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input and output paths, the
//! configuration file, logging verbosity and how diagnostics are printed.

use clap::{Parser, ValueEnum};

/// How compile diagnostics are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportStyle {
    /// One `path:row:col: severity: message` line per diagnostic
    #[default]
    Short,
    /// Source snippet with labels and help
    Fancy,
}

/// Command-line arguments for the Tagflow process compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Tagflow file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Write the compiled diagram to this file as TOML
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Diagnostic format
    #[arg(long, value_enum, default_value_t = ReportStyle::Short)]
    pub report: ReportStyle,
}
