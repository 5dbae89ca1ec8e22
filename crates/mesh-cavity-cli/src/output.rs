//! Output formatting utilities for the CLI.

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a value as pretty JSON. Text callers print their own lines.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Json {
        return;
    }

    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error(&format!("failed to encode JSON: {e}")),
    }
}

/// Print a success message.
pub fn success(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Text {
        return;
    }
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a line of text output.
pub fn info(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Text {
        return;
    }
    println!("{}", msg);
}

/// Print a section heading.
pub fn heading(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Text {
        return;
    }
    println!("{}", msg.bold());
}

/// Print a warning message.
pub fn warning(msg: &str, format: OutputFormat, quiet: bool) {
    if quiet || format != OutputFormat::Text {
        return;
    }
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an error. Never suppressed.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}
