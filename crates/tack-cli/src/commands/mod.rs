//! Command implementations for the tack CLI.
//!
//! Each subcommand lives in its own module and exposes an `execute` function
//! taking its parsed arguments.

pub mod check;
pub mod emit;
pub mod resolve;
pub mod rules;
pub mod show;
pub(crate) mod utils;

pub use check::execute as check_execute;
pub use emit::execute as emit_execute;
pub use resolve::execute as resolve_execute;
pub use rules::execute as rules_execute;
pub use show::execute as show_execute;
