//! Logging setup for the tack CLI.
//!
//! Library crates emit `tracing` events; this module installs the subscriber
//! that prints them. Verbosity is chosen in this order:
//!
//! 1. `--verbose`: debug level for the tack crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`, when set
//! 4. info level for the tack crates
//!
//! ```rust,no_run
//! use tack_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("loading config");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "tack_config=debug,tack_build=debug,tack_cli=debug";
const QUIET_FILTER: &str = "tack_config=error,tack_build=error,tack_cli=error";
const DEFAULT_FILTER: &str = "tack_config=info,tack_build=info,tack_cli=info";

/// Filter for the given flags, consulting `RUST_LOG` only when neither is set.
pub fn env_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before any logging.
///
/// Logs go to stderr so `tack show` output can be piped.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Whether stderr output should carry ANSI colors.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise the terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
