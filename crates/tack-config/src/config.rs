//! The top-level build configuration record and profile merging.
//!
//! A `BuildConfig` is constructed once (from a preset, a file, or a value),
//! validated, and handed to the build untouched. Profiles are partial records
//! deep-merged over the base when materialized.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::devtool::SourceMapMode;
use crate::error::{ConfigError, Result as ConfigResult};
use crate::helpers::default_entry;
use crate::output::OutputOptions;
use crate::plugin::{HtmlPluginOptions, PluginInvocation};
use crate::resolve::ResolveOptions;
use crate::rules::RuleSet;

/// Build mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default)]
    pub mode: Mode,

    /// Source-map mode
    #[serde(default)]
    pub devtool: SourceMapMode,

    /// Script that begins the dependency graph walk
    #[serde(default = "default_entry")]
    pub entry: PathBuf,

    #[serde(default)]
    pub output: OutputOptions,

    #[serde(default)]
    pub resolve: ResolveOptions,

    /// Transform rule table
    #[serde(default)]
    pub module: RuleSet,

    /// Post-build steps, run in order
    #[serde(default)]
    pub plugins: Vec<PluginInvocation>,

    /// Named partial configs, merged by `materialize_profile`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, Value>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            devtool: SourceMapMode::default(),
            entry: default_entry(),
            output: OutputOptions::default(),
            resolve: ResolveOptions::default(),
            module: RuleSet::default(),
            plugins: Vec::new(),
            profiles: BTreeMap::new(),
        }
    }
}

impl BuildConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use tack_config::BuildConfig;
    /// use serde_json::json;
    /// use std::path::PathBuf;
    ///
    /// let value = json!({
    ///     "entry": "./src/main.js",
    ///     "output": { "filename": "app.js" }
    /// });
    ///
    /// let config = BuildConfig::from_value(value).unwrap();
    /// assert_eq!(config.entry, PathBuf::from("./src/main.js"));
    /// assert_eq!(config.output.filename, "app.js");
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        serde_json::from_str(source).map_err(|e| ConfigError::InvalidValue {
            field: "json".to_string(),
            hint: Some(format!("Invalid JSON config: {}", e)),
        })
    }

    pub fn to_json_string_pretty(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        toml::from_str(source).map_err(|e| ConfigError::InvalidValue {
            field: "toml".to_string(),
            hint: Some(format!("Invalid TOML config: {}", e)),
        })
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "toml".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Entry path resolved against the project root.
    pub fn entry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.entry)
    }

    /// Output directory resolved against the project root.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        self.output.dir(root)
    }

    /// Enabled plugins, in execution order.
    pub fn active_plugins(&self) -> impl Iterator<Item = &PluginInvocation> {
        self.plugins.iter().filter(|p| p.enabled)
    }

    /// Options of every enabled HTML plugin, paired with its index in `plugins`.
    pub fn html_plugins(&self) -> ConfigResult<Vec<(usize, HtmlPluginOptions)>> {
        self.plugins
            .iter()
            .enumerate()
            .filter(|(_, p)| p.enabled && p.is_html())
            .map(|(i, p)| HtmlPluginOptions::from_invocation(p).map(|options| (i, options)))
            .collect()
    }

    pub fn with_plugin(mut self, plugin: PluginInvocation) -> Self {
        self.plugins.push(plugin);
        self
    }
}

impl BuildConfig {
    /// Deep-merge the named profile over the base record.
    ///
    /// Objects merge key by key; arrays and scalars replace. The profile
    /// table itself is kept so the result can be re-materialized.
    pub fn materialize_profile(self, profile: Option<&str>) -> ConfigResult<Self> {
        let Some(name) = profile else {
            return Ok(self);
        };

        let overrides = self
            .profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;

        if overrides.is_null() {
            return Ok(self);
        }
        if !overrides.is_object() {
            return Err(ConfigError::InvalidProfileOverride {
                message: format!("profile `{name}` must be a table"),
            });
        }

        tracing::debug!(profile = name, "materializing profile");

        let profiles = self.profiles.clone();
        let mut base =
            serde_json::to_value(&self).map_err(|err| ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            })?;
        merge_values(&mut base, &overrides);

        let mut merged: BuildConfig =
            serde_json::from_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
                message: format!("profile `{name}`: {err}"),
            })?;
        merged.profiles = profiles;
        Ok(merged)
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

pub(crate) fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "entry": "./src/index.js",
            "devtool": "source-map",
            "output": { "publicPath": "/static/" }
        });

        let config = BuildConfig::from_value(value).unwrap();
        assert_eq!(config.devtool, SourceMapMode::SourceMap);
        assert_eq!(config.output.public_path, "/static/");
        assert_eq!(config.output.filename, "bundle.js");
    }

    #[test]
    fn to_value_uses_camel_case() {
        let value = BuildConfig::default().to_value().unwrap();
        assert_eq!(value["output"]["chunkFilename"], json!("[id].js"));
        assert_eq!(value["devtool"], json!(false));
        assert!(value.get("profiles").is_none());
    }

    #[test]
    fn unknown_field_type_is_reported() {
        let err = BuildConfig::from_value(json!({ "plugins": "html" })).unwrap_err();
        assert_eq!(err.field(), Some("config"));
    }

    #[test]
    fn profile_merging_works() {
        let value = json!({
            "mode": "development",
            "devtool": "cheap-module-eval-source-map",
            "output": { "filename": "bundle.js", "publicPath": "" },
            "profiles": {
                "production": {
                    "mode": "production",
                    "devtool": "source-map",
                    "output": { "filename": "bundle.min.js" }
                }
            }
        });

        let config = BuildConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("production"))
            .unwrap();

        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.devtool, SourceMapMode::SourceMap);
        assert_eq!(config.output.filename, "bundle.min.js");
        assert_eq!(config.output.public_path, "");
        assert!(config.profiles.contains_key("production"));
    }

    #[test]
    fn profile_arrays_replace() {
        let value = json!({
            "resolve": { "extensions": [".js", ".jsx"] },
            "profiles": { "ts": { "resolve": { "extensions": [".ts"] } } }
        });
        let config = BuildConfig::from_value(value)
            .unwrap()
            .materialize_profile(Some("ts"))
            .unwrap();
        assert_eq!(config.resolve.extensions, vec![".ts"]);
    }

    #[test]
    fn missing_profile_is_an_error() {
        let err = BuildConfig::default()
            .materialize_profile(Some("staging"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound(name) if name == "staging"));
    }

    #[test]
    fn no_profile_is_identity() {
        let config = BuildConfig::default();
        assert_eq!(config.clone().materialize_profile(None).unwrap(), config);
    }
}
