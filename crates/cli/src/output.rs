//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a hint below an error or warning
    pub fn hint(message: &str) {
        eprintln!("  {} {}", "→".dimmed(), message.dimmed());
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `key: value` line
    pub fn field(key: &str, value: &str) {
        println!("  {}", format_field(key, value, FIELD_WIDTH));
    }
}

/// Column width for field names
const FIELD_WIDTH: usize = 28;

/// Format a `key: value` line with the key padded to `width`
pub fn format_field(key: &str, value: &str, width: usize) -> String {
    format!("{:<width$} {}", format!("{key}:"), value)
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_pads_key() {
        assert_eq!(format_field("minSdk", "21", 10), "minSdk:    21");
    }

    #[test]
    fn test_format_field_long_key() {
        assert_eq!(format_field("applicationId", "x", 4), "applicationId: x");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "warning", "warnings"), "1 warning");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(0, "warning", "warnings"), "0 warnings");
    }
}
