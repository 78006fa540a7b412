//! Rendering of access decisions and session details.
//!
//! Tables go to stdout for people, JSON goes to stdout for scripts. Notices
//! about the session itself go to stderr so they never corrupt JSON output.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Prints decision or session rows. `empty` is shown in table mode when
/// there is nothing to list; JSON mode always prints an array.
pub fn print_rows<T: Serialize + Tabled>(rows: &[T], format: OutputFormat, empty: &str) {
    match format {
        OutputFormat::Table if rows.is_empty() => println!("{}", empty),
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Json => print_json(&rows),
    }
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Could not encode output: {}", e)),
    }
}

/// Check mark for a granted decision, cross for a denied one.
pub fn mark(granted: bool) -> &'static str {
    if granted { "✓" } else { "✗" }
}

pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Session notices (expired, not signed in) go to stderr.
pub fn print_warning(msg: &str) {
    eprintln!("⚠ {}", msg);
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Labelled detail line printed under a table.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", key), value);
}
