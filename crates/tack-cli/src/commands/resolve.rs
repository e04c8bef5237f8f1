//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::commands::utils::{self, LoadedConfig};
use crate::error::{CliError, Result};

/// Resolve an import request and print the matching file.
///
/// # Errors
///
/// Returns `CliError::Unresolved`, listing every candidate tried, when no
/// candidate exists.
pub fn execute(args: ResolveArgs) -> Result<()> {
    let LoadedConfig { config, root } = utils::load_config(&args.config)?;
    let from = match &args.from {
        Some(dir) => utils::resolve_path(dir, &root),
        None => root,
    };

    match config.resolve.resolve_request(&from, &args.request) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::Unresolved {
            tried: config.resolve.candidates(&args.request),
            request: args.request,
            from,
        }),
    }
}
