use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::helpers::{default_html_filename, default_true};

/// Plugin names that select the HTML shell generator.
pub const HTML_PLUGIN_NAMES: &[&str] = &["html", "html-webpack-plugin"];

/// A post-build step, run in list order after asset emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInvocation {
    pub name: String,

    /// Plugin-specific options, forwarded verbatim
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub options: IndexMap<String, Value>,

    /// Whether the plugin should run
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl PluginInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: IndexMap::new(),
            enabled: true,
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn is_html(&self) -> bool {
        HTML_PLUGIN_NAMES.contains(&self.name.as_str())
    }

    /// Options as a JSON object.
    pub fn options_value(&self) -> Value {
        Value::Object(
            self.options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

/// Where generated `<script>` tags go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "InjectRepr", into = "InjectRepr")]
pub enum InjectMode {
    /// Before `</body>` (default)
    #[default]
    Body,
    /// Before `</head>`
    Head,
    /// Leave the template untouched
    Disabled,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum InjectRepr {
    Flag(bool),
    Place(String),
}

impl TryFrom<InjectRepr> for InjectMode {
    type Error = String;

    fn try_from(repr: InjectRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            InjectRepr::Flag(true) => Ok(InjectMode::Body),
            InjectRepr::Flag(false) => Ok(InjectMode::Disabled),
            InjectRepr::Place(place) => match place.as_str() {
                "body" => Ok(InjectMode::Body),
                "head" => Ok(InjectMode::Head),
                other => Err(format!("unknown inject target `{other}`, expected body or head")),
            },
        }
    }
}

impl From<InjectMode> for InjectRepr {
    fn from(mode: InjectMode) -> Self {
        match mode {
            InjectMode::Body => InjectRepr::Place("body".to_string()),
            InjectMode::Head => InjectRepr::Place("head".to_string()),
            InjectMode::Disabled => InjectRepr::Flag(false),
        }
    }
}

/// Typed view of the HTML plugin's options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlPluginOptions {
    /// Template path, relative to the project root; a built-in shell is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Output filename inside the output directory
    #[serde(default = "default_html_filename")]
    pub filename: String,

    #[serde(default)]
    pub inject: InjectMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl HtmlPluginOptions {
    /// Parse the options of an HTML plugin invocation.
    pub fn from_invocation(invocation: &PluginInvocation) -> Result<Self> {
        let options: Self = serde_json::from_value(invocation.options_value()).map_err(|e| {
            ConfigError::InvalidValue {
                field: format!("plugins[{}].options", invocation.name),
                hint: Some(e.to_string()),
            }
        })?;

        if options.filename.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("plugins[{}].options.filename", invocation.name),
                hint: Some("HTML output filename cannot be empty".to_string()),
            });
        }

        Ok(options)
    }

    /// The plugin invocation carrying these options.
    pub fn into_invocation(self) -> PluginInvocation {
        let mut invocation = PluginInvocation::new("html");
        if let Ok(Value::Object(map)) = serde_json::to_value(&self) {
            invocation.options = map.into_iter().collect();
        }
        invocation
    }
}

impl Default for HtmlPluginOptions {
    fn default() -> Self {
        Self {
            template: None,
            filename: default_html_filename(),
            inject: InjectMode::Body,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn html_options_parse_with_defaults() {
        let invocation = PluginInvocation::new("html-webpack-plugin")
            .with_option("template", "src/index.html");
        assert!(invocation.is_html());

        let options = HtmlPluginOptions::from_invocation(&invocation).unwrap();
        assert_eq!(options.template, Some(PathBuf::from("src/index.html")));
        assert_eq!(options.filename, "index.html");
        assert_eq!(options.inject, InjectMode::Body);
    }

    #[test]
    fn inject_accepts_bool_and_place() {
        let parse = |v: Value| serde_json::from_value::<InjectMode>(v).unwrap();
        assert_eq!(parse(json!(true)), InjectMode::Body);
        assert_eq!(parse(json!(false)), InjectMode::Disabled);
        assert_eq!(parse(json!("head")), InjectMode::Head);
        assert!(serde_json::from_value::<InjectMode>(json!("footer")).is_err());
    }

    #[test]
    fn bad_options_name_the_plugin() {
        let invocation = PluginInvocation::new("html").with_option("inject", "sideways");
        let err = HtmlPluginOptions::from_invocation(&invocation).unwrap_err();
        assert_eq!(err.field(), Some("plugins[html].options"));
    }

    #[test]
    fn empty_filename_is_rejected() {
        let invocation = PluginInvocation::new("html").with_option("filename", "  ");
        assert!(HtmlPluginOptions::from_invocation(&invocation).is_err());
    }

    #[test]
    fn into_invocation_roundtrips() {
        let options = HtmlPluginOptions {
            template: Some(PathBuf::from("src/index.html")),
            title: Some("App".to_string()),
            ..HtmlPluginOptions::default()
        };
        let invocation = options.clone().into_invocation();
        assert_eq!(HtmlPluginOptions::from_invocation(&invocation).unwrap(), options);
    }

    #[test]
    fn enabled_defaults_to_true() {
        let invocation: PluginInvocation = serde_json::from_value(json!({ "name": "html" })).unwrap();
        assert!(invocation.enabled);
        assert!(invocation.options.is_empty());
    }
}
