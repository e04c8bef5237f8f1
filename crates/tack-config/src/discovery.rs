//! File-based config discovery for CLI use
//!
//! Sources are layered with figment, later layers winning:
//! preset (or defaults) < config file < `TACK_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format as _, Json, Serialized, Toml};
use figment::Figment;
use serde_json::{Map, Value};

use crate::config::BuildConfig;
use crate::error::{ConfigError, Result};

/// Prefix of environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "TACK_";

const CONFIG_FILES: &[&str] = &["tack.toml", "tack.json"];
const PACKAGE_FIELD: &str = "tack";

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use tack_config::{presets, ConfigDiscovery};
///
/// let config = ConfigDiscovery::new(".")
///     .with_base(presets::with_html())
///     .load()
///     .unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
    base: Option<BuildConfig>,
    explicit: Option<PathBuf>,
    env: bool,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            base: None,
            explicit: None,
            env: true,
        }
    }

    /// Start from `base` instead of the built-in defaults. A base also makes
    /// a missing config file acceptable.
    pub fn with_base(mut self, base: BuildConfig) -> Self {
        self.base = Some(base);
        self
    }

    /// Load this file instead of searching the root.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Toggle the `TACK_*` environment layer.
    pub fn with_env(mut self, enabled: bool) -> Self {
        self.env = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. tack.toml
    /// 2. tack.json
    /// 3. package.json with a non-null `tack` field
    pub fn find(&self) -> Option<PathBuf> {
        if let Some(found) = CONFIG_FILES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
        {
            return Some(found);
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed: Value = serde_json::from_str(&content).ok()?;
        match parsed.get(PACKAGE_FIELD) {
            Some(field) if !field.is_null() => Some(pkg_path),
            _ => None,
        }
    }

    /// Load config from the discovered (or explicit) file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is found and no base
    /// was given.
    pub fn load(&self) -> Result<BuildConfig> {
        let file = match &self.explicit {
            Some(path) => {
                let path = self.root.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound { root: path });
                }
                Some(path)
            }
            None => self.find(),
        };

        if file.is_none() && self.base.is_none() {
            return Err(ConfigError::NotFound {
                root: self.root.clone(),
            });
        }

        let base = self.base.clone().unwrap_or_default();
        let mut figment = Figment::new().merge(Serialized::defaults(base));

        if let Some(path) = &file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = merge_file(figment, path)?;
        }

        if self.env {
            let overrides = env_overrides()?;
            if overrides.as_object().is_some_and(|map| !map.is_empty()) {
                tracing::debug!(prefix = ENV_PREFIX, "applying environment overrides");
                figment = figment.merge(Serialized::defaults(overrides));
            }
        }

        figment.extract().map_err(figment_error)
    }

    /// Load config with profile merging
    pub fn load_with_profile(&self, profile: &str) -> Result<BuildConfig> {
        self.load()?.materialize_profile(Some(profile))
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if name == "package.json" {
        return Ok(figment.merge(Serialized::defaults(package_field(path)?)));
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        Some("json") => Ok(figment.merge(Json::file(path))),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

fn package_field(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;

    let mut parsed: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
            field: "package.json".to_string(),
            hint: Some(format!("Invalid JSON: {}", e)),
        })?;

    match parsed.get_mut(PACKAGE_FIELD).map(Value::take) {
        Some(Value::Null) | None => Err(ConfigError::InvalidValue {
            field: PACKAGE_FIELD.to_string(),
            hint: Some("Add a 'tack' field to your package.json".to_string()),
        }),
        Some(value) => Ok(value),
    }
}

/// Fields whose environment value is taken verbatim instead of parsed.
const STRING_FIELDS: &[&str] = &[
    "entry",
    "mode",
    "output.path",
    "output.filename",
    "output.chunkFilename",
    "output.publicPath",
];

/// `TACK_OUTPUT__PUBLIC_PATH=/static/` becomes `{ "output": { "publicPath": "/static/" } }`.
///
/// String fields keep the raw text, so `[id].js` or `2024` stay strings;
/// everything else is parsed the way figment parses environment values.
fn env_overrides() -> Result<Value> {
    let mut overrides = Value::Object(Map::new());
    for (key, raw) in Env::prefixed(ENV_PREFIX).split("__").iter() {
        let path: Vec<String> = key
            .as_str()
            .split('.')
            .map(camelize)
            .filter(|segment| !segment.is_empty())
            .collect();
        if path.is_empty() {
            continue;
        }

        let dotted = path.join(".");
        let value = if STRING_FIELDS.contains(&dotted.as_str()) {
            Value::String(raw)
        } else {
            let parsed: figment::value::Value = raw.parse().unwrap_or_else(|never| match never {});
            serde_json::to_value(parsed).map_err(|err| ConfigError::InvalidValue {
                field: dotted.clone(),
                hint: Some(err.to_string()),
            })?
        };
        insert_path(&mut overrides, &path, value);
    }
    Ok(overrides)
}

fn insert_path(target: &mut Value, path: &[String], value: Value) {
    let Some((key, rest)) = path.split_first() else {
        *target = value;
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        insert_path(map.entry(key.clone()).or_insert(Value::Null), rest, value);
    }
}

fn camelize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

fn figment_error(err: figment::Error) -> ConfigError {
    let field = if err.path.is_empty() {
        "config".to_string()
    } else {
        err.path.join(".")
    };
    ConfigError::InvalidValue {
        field,
        hint: Some(err.kind.to_string()),
    }
}

/// Discover and load config from current directory (convenience function)
pub fn discover() -> Result<BuildConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}

/// Discover and load config with profile (convenience function)
pub fn discover_with_profile(profile: &str) -> Result<BuildConfig> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load_with_profile(profile)
}
