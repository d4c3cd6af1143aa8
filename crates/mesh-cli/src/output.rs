//! Output formatting utilities for the CLI.

use std::fmt::Display;

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a report: its `Display` form as text, or pretty JSON.
pub fn report<T: Serialize + Display>(value: &T, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    if quiet {
        return Ok(());
    }

    match format {
        OutputFormat::Text => print!("{}", value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Print a success message.
pub fn success(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format == OutputFormat::Json {
        return;
    }
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a warning message to stderr.
pub fn warning(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format == OutputFormat::Json {
        return;
    }
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}
