use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::*;
use crate::cli::validation::parse_chunk;

/// Available tack subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate configuration against the project
    ///
    /// Loads the configuration, checks every field, then confirms that the
    /// entry and HTML template exist and the output directory is writable.
    Check(CheckArgs),

    /// Print the resolved configuration
    ///
    /// Writes the configuration after presets, config file, environment
    /// overrides and profile are applied. Output goes to stdout.
    Show(ShowArgs),

    /// Resolve an import request using `resolve.extensions`
    Resolve(ResolveArgs),

    /// Show which transform rules apply to source paths
    ///
    /// For each path, lists the matching rules and the loaders in the order
    /// they run over the source.
    Rules(RulesArgs),

    /// Write prebuilt artifacts and run post-build plugins
    ///
    /// Names the bundle and chunks with the output templates, writes them to
    /// the output directory, then runs the configured plugins (such as the
    /// HTML shell generator).
    Emit(EmitArgs),
}

/// Where the configuration comes from
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Config file to load instead of searching the project root
    ///
    /// Relative paths are resolved against --root. Supports .toml, .json and
    /// package.json (its "tack" field).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Preset to use as the base configuration
    ///
    /// Without a config file, the html preset is used.
    #[arg(short, long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Named profile to merge over the configuration
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Project root that relative paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Ignore TACK_* environment overrides
    #[arg(long)]
    pub no_env: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Only validate field values, skip filesystem checks
    #[arg(long)]
    pub schema_only: bool,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ShowFormat,
}

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Import request, e.g. `./components/App`
    #[arg(value_name = "REQUEST")]
    pub request: String,

    /// Directory the request is relative to (defaults to --root)
    #[arg(long, value_name = "DIR")]
    pub from: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the rules command
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Source paths to match, as they appear relative to the project
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the emit command
#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Bundle produced for the entry
    #[arg(long, value_name = "FILE")]
    pub bundle: PathBuf,

    /// Lazily loaded chunk, as ID=FILE (repeatable)
    ///
    /// The file stem is used as the chunk's [name].
    #[arg(long = "chunk", value_name = "ID=FILE", value_parser = parse_chunk)]
    pub chunks: Vec<(String, PathBuf)>,

    /// Asset to pass through the url-loader rule (repeatable)
    #[arg(long = "asset", value_name = "PATH")]
    pub assets: Vec<PathBuf>,

    /// Fail instead of replacing files that already exist
    #[arg(long)]
    pub no_overwrite: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}
