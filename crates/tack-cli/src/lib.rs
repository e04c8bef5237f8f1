//! Tack CLI - inspect, validate and apply bundler build configurations.
//!
//! The binary is a thin layer over `tack-config` and `tack-build`:
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - one module per subcommand
//! - [`error`] - `CliError` and its miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines and formatting for the terminal
//!
//! # Example
//!
//! ```rust,no_run
//! use tack_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
