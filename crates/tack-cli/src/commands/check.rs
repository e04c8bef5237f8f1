//! Check command implementation.
//!
//! Validates the configuration without writing anything.

use tack_config::{BuildConfig, Mode, SourceMapMode, validate_fs, validate_schema};

use crate::cli::CheckArgs;
use crate::commands::utils::{self, LoadedConfig};
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// 1. Load the configuration (preset, file, environment, profile)
/// 2. Validate every field
/// 3. Unless `--schema-only`, check entry, template and output directory
/// 4. Report settings that are valid but likely unintended
pub fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");

    let LoadedConfig { config, root } = utils::load_config(&args.config)?;

    if args.schema_only {
        validate_schema(&config)?;
        ui::success("Configuration is valid");
        return Ok(());
    }

    validate_fs(&config, &root)?;
    ui::success("Configuration is valid");
    ui::success(&format!("  entry {} exists", config.entry.display()));
    ui::success(&format!(
        "  output directory {} is writable",
        config.output_dir(&root).display()
    ));

    let plugins: Vec<&str> = config.active_plugins().map(|p| p.name.as_str()).collect();
    if !plugins.is_empty() {
        ui::info(&format!("  plugins: {}", plugins.join(", ")));
    }
    if let Some(devtool) = devtool_summary(config.devtool) {
        ui::info(&format!("  devtool: {devtool}"));
    }
    let profiles: Vec<&str> = config.profile_names().collect();
    if !profiles.is_empty() {
        ui::info(&format!("  profiles: {}", profiles.join(", ")));
    }

    let warnings = collect_warnings(&config);
    if !warnings.is_empty() {
        ui::warning(&format!("Found {} potential issues:", warnings.len()));
        for warning in &warnings {
            ui::warning(&format!("  - {}", warning));
        }
    }

    ui::success("All checks passed!");
    Ok(())
}

/// Where the source maps for `devtool` end up, or `None` when disabled.
fn devtool_summary(devtool: SourceMapMode) -> Option<String> {
    let name = devtool.as_str()?;
    let placement = if devtool.emits_map_file() {
        "writes .map files next to the bundle"
    } else if devtool.is_eval() {
        "mappings inlined in eval() wrappers"
    } else {
        "mappings inlined in the bundle"
    };
    Some(format!("{name} ({placement})"))
}

/// Settings that validate but are probably mistakes.
fn collect_warnings(config: &BuildConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.mode == Mode::Production && !config.devtool.is_production_safe() {
        warnings.push(format!(
            "devtool `{}` inlines sources or uses eval; prefer source-map in production",
            config.devtool.as_str().unwrap_or_default()
        ));
    }

    for plugin in config.plugins.iter().filter(|p| !p.enabled) {
        warnings.push(format!("plugin `{}` is disabled", plugin.name));
    }

    if !config.resolve.extensions.is_empty() && !config.resolve.is_resolvable(&config.entry) {
        warnings.push(format!(
            "entry `{}` does not end in any of resolve.extensions ({})",
            config.entry.display(),
            config.resolve.extensions.join(", ")
        ));
    }

    warnings
}
