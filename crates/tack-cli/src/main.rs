//! Tack CLI entry point.
//!
//! Parses arguments, sets up logging and colors, then dispatches to the
//! selected command.

use clap::Parser;
use miette::Result;
use tack_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Check(check_args) => commands::check_execute(check_args),
        cli::Command::Show(show_args) => commands::show_execute(show_args),
        cli::Command::Resolve(resolve_args) => commands::resolve_execute(resolve_args),
        cli::Command::Rules(rules_args) => commands::rules_execute(rules_args),
        cli::Command::Emit(emit_args) => commands::emit_execute(emit_args),
    };

    // Render failures as miette diagnostics
    result.map_err(error::cli_error_to_miette)
}
