//! Terminal UI components and styling for the CLI.
//!
//! Output goes through the `log` facade so it also lands in the log file.
//! Errors are logged at error level so they survive a quiet `RUST_LOG`.
//! Colors are disabled when `NO_COLOR` is set.

use console::style;
use log::{error, info};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

/// Indentation of status lines.
const STATUS_INDENT: &str = "  ";

/// Labels are padded to this display width.
const LABEL_WIDTH: usize = 15;

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header
pub fn print_section(title: &str) {
    info!("");
    if should_use_color() {
        info!("===== {} =====", title.to_uppercase().cyan());
    } else {
        info!("===== {} =====", title.to_uppercase());
    }
    info!("");
}

/// Formats a status line (key-value pair) without color.
pub fn format_status(label: &str, value: &str) -> String {
    let padding = LABEL_WIDTH.saturating_sub(label.width()).max(1);
    format!("{}{}:{}{}", STATUS_INDENT, label, " ".repeat(padding), value)
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    if should_use_color() && highlight {
        let padding = LABEL_WIDTH.saturating_sub(label.width()).max(1);
        info!(
            "{}{}:{}{}",
            STATUS_INDENT,
            label,
            " ".repeat(padding),
            style(value).bold()
        );
    } else {
        info!("{}", format_status(label, value));
    }
}

/// Print a list entry
pub fn print_item(text: &str) {
    info!("{}» {}", STATUS_INDENT, text);
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        info!("  ✓ {}", message.green());
    } else {
        info!("  ✓ {message}");
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        info!("  ⚠ {}", message.yellow());
    } else {
        info!("  ⚠ {message}");
    }
}

/// Print an error message
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        error!("✗ {}", title.red().bold());
    } else {
        error!("✗ {title}");
    }
    error!("  Message:    {message}");
    if let Some(suggestion_text) = suggestion {
        error!("  Suggestion: {suggestion_text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status_pads_label() {
        assert_eq!(format_status("Monitor", "1"), "  Monitor:        1");
    }

    #[test]
    fn test_format_status_long_label_keeps_one_space() {
        assert_eq!(
            format_status("A very long label here", "x"),
            "  A very long label here: x"
        );
    }
}
