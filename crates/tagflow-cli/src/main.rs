//! Tagflow CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, info};

use tagflow_cli::{Args, error_adapter::render_error};

/// Parses `--log-level`, falling back to `warn` for unknown names.
fn log_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {name}. Using 'warn' instead.");
        LevelFilter::Warn
    })
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let level = log_level(&args.log_level);
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();

    info!(level:?; "Starting Tagflow");
    debug!(args:?; "Parsed arguments");

    let compilation = match tagflow_cli::run(&args) {
        Ok(compilation) => compilation,
        Err(err) => {
            eprintln!("{}", render_error(&err, &args.input, args.report));
            process::exit(1);
        }
    };

    for warning in compilation.warnings() {
        eprintln!("{}", warning.report_line(&args.input));
    }
    info!(warnings = compilation.warnings().len(); "Completed successfully");
}
