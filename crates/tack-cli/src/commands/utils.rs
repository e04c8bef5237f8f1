//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};

use tack_config::{BuildConfig, ConfigDiscovery, ConfigError, Preset};

use crate::cli::ConfigArgs;
use crate::error::Result;
use crate::ui;

/// A configuration together with the root it was loaded for.
#[derive(Debug)]
pub(crate) struct LoadedConfig {
    pub config: BuildConfig,
    pub root: PathBuf,
}

/// Resolve `path` against `cwd` unless it is already absolute.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Load the configuration described by the shared config flags.
///
/// Layers, lowest first: preset, config file, `TACK_*` variables, profile.
/// With neither a preset nor a config file, the default preset is used.
pub(crate) fn load_config(args: &ConfigArgs) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir()?;
    let root = resolve_path(&args.root, &cwd);

    let mut discovery = ConfigDiscovery::new(&root).with_env(!args.no_env);
    if let Some(path) = &args.config {
        discovery = discovery.with_config_file(path);
    }

    let config = match args.preset {
        Some(preset) => discovery.with_base(Preset::from(preset).build()).load()?,
        None => match discovery.load() {
            Err(ConfigError::NotFound { .. }) if args.config.is_none() => {
                let preset = Preset::default();
                ui::warning(&format!(
                    "No tack config found in {}, using the {} preset",
                    root.display(),
                    preset
                ));
                ConfigDiscovery::new(&root)
                    .with_env(!args.no_env)
                    .with_base(preset.build())
                    .load()?
            }
            loaded => loaded?,
        },
    };

    let config = config.materialize_profile(args.profile.as_deref())?;
    if let Some(profile) = &args.profile {
        tracing::debug!(profile = %profile, "profile applied");
    }

    Ok(LoadedConfig { config, root })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_cwd() {
        let cwd = Path::new("/work");
        assert_eq!(resolve_path(Path::new("app"), cwd), PathBuf::from("/work/app"));
        assert_eq!(resolve_path(Path::new("/abs"), cwd), PathBuf::from("/abs"));
    }
}
