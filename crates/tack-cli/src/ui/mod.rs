//! Terminal output helpers.
//!
//! Status lines go to stderr so command results on stdout stay pipeable.
//!
//! ```no_run
//! use tack_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Checking configuration...");
//! ui::success("Configuration is valid");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_size, print_build_report};
pub use messages::{info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide once whether status lines are colored.
///
/// `--no-color` always wins; otherwise `NO_COLOR`, `FORCE_COLOR` and the
/// terminal are consulted.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && crate::logger::should_use_colors();
    COLORS.store(enabled, Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
