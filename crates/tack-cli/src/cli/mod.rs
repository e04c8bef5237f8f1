//! Command-line interface definition for tack.
//!
//! - `tack check` - load and validate a configuration against a project
//! - `tack show` - print the resolved configuration
//! - `tack resolve` - resolve an extensionless import
//! - `tack rules` - list the transform rules and loaders for source paths
//! - `tack emit` - write prebuilt artifacts and run post-build plugins

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{CheckArgs, Command, ConfigArgs, EmitArgs, ResolveArgs, RulesArgs, ShowArgs};
pub use enums::*;
pub use validation::parse_chunk;

/// Tack - build configuration for a JavaScript bundler
#[derive(Parser, Debug)]
#[command(
    name = "tack",
    version,
    about = "Inspect, validate and apply bundler build configurations",
    long_about = "Tack loads a bundler configuration from tack.toml, tack.json or the\n\
                  \"tack\" field of package.json, layered over a preset and TACK_*\n\
                  environment overrides, and validates it before anything is written."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
