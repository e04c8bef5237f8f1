//! Miette rendering for CLI errors.

use miette::{MietteDiagnostic, Report, Severity};
use tack_build::BuildError;
use tack_config::ConfigError;

use crate::error::CliError;

/// Convert a [`CliError`] into a miette report with a code and, where one
/// helps, a hint.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(BuildError::Config(e)) | CliError::Config(e) => config_error_to_miette(e),
        CliError::Build(e) => Report::new(e),
        CliError::Unresolved { request, from, tried } => {
            let help = format!("Tried, in order:\n  {}", tried.join("\n  "));
            diagnostic(
                format!("cannot resolve `{}` from {}", request, from.display()),
                "UNRESOLVED",
                Some(help),
            )
        }
        CliError::FileNotFound(ref path) => diagnostic(
            err.to_string(),
            "FILE_NOT_FOUND",
            Some(format!("Check that {} exists", path.display())),
        ),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    let help = match &err {
        ConfigError::NotFound { .. } => Some(
            "Create tack.toml or tack.json, add a \"tack\" field to package.json, or pass --preset"
                .to_string(),
        ),
        ConfigError::ProfileNotFound(_) => {
            Some("Profiles are declared under the `profiles` table of the config".to_string())
        }
        ConfigError::EntryNotFound { .. } | ConfigError::EntryNotAFile { .. } => {
            Some("`entry` is resolved against --root".to_string())
        }
        ConfigError::TemplateNotFound { .. } => {
            Some("Set the html plugin `template` option to an existing file".to_string())
        }
        _ => err.field().map(|field| format!("Check `{field}` in your tack config")),
    };
    diagnostic(err.to_string(), "INVALID_CONFIG", help)
}

fn diagnostic(message: String, code: &str, help: Option<String>) -> Report {
    let mut diagnostic = MietteDiagnostic::new(message)
        .with_code(code)
        .with_severity(Severity::Error);
    if let Some(help) = help {
        diagnostic = diagnostic.with_help(help);
    }
    Report::new(diagnostic)
}
