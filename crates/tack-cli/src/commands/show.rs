//! Show command implementation.

use crate::cli::{ShowArgs, ShowFormat};
use crate::commands::utils::{self, LoadedConfig};
use crate::error::Result;

/// Print the resolved configuration to stdout.
///
/// Field values are validated first so the printed configuration is one
/// `check --schema-only` would accept.
pub fn execute(args: ShowArgs) -> Result<()> {
    let LoadedConfig { config, .. } = utils::load_config(&args.config)?;
    tack_config::validate_schema(&config)?;

    let rendered = match args.format {
        ShowFormat::Json => config.to_json_string_pretty()?,
        ShowFormat::Toml => config.to_toml_string()?,
    };

    println!("{}", rendered.trim_end());
    Ok(())
}
