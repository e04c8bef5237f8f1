//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Style};

fn line(symbol: &str, symbol_style: Style, message: &str, message_style: Style) {
    if super::colors_enabled() {
        eprintln!("{} {}", symbol.style(symbol_style), message.style(message_style));
    } else {
        eprintln!("{symbol} {message}");
    }
}

/// Print a success message to stderr.
///
/// ```no_run
/// tack_cli::ui::success("Configuration is valid");
/// ```
pub fn success(message: &str) {
    line("✓", Style::new().green().bold(), message, Style::new());
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    line("ℹ", Style::new().blue().bold(), message, Style::new());
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    line("⚠", Style::new().yellow().bold(), message, Style::new().yellow());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages_do_not_panic() {
        success("Success message");
        info("Info message");
        warning("Warning message");
    }
}
