//! The three progressively elaborated build configurations.
//!
//! `basic` only wires entry and output, `with_loaders` adds the rule table
//! and resolution, and `with_html` adds the HTML shell plugin on top.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::json;

use crate::config::BuildConfig;
use crate::devtool::SourceMapMode;
use crate::plugin::{HtmlPluginOptions, InjectMode};
use crate::resolve::ResolveOptions;
use crate::rules::{LoaderUse, RuleSet, TransformRule};

const SCRIPT_TEST: &str = r"\.js$";
const STYLE_TEST: &str = r"\.css$";
const IMAGE_TEST: &str = r"\.(png|jpe?g|gif)$";
const VENDOR_EXCLUDE: &str = "node_modules";

/// Entry, output and development source maps.
pub fn basic() -> BuildConfig {
    let mut config = BuildConfig {
        devtool: SourceMapMode::CheapModuleEvalSourceMap,
        entry: PathBuf::from("./src/index.js"),
        ..BuildConfig::default()
    };
    config.output.path = PathBuf::from("dist");
    config.output.filename = "bundle.js".to_string();
    config.output.public_path = String::new();
    config
}

/// `basic` plus resolution and the script/stylesheet/image rules.
pub fn with_loaders() -> BuildConfig {
    let mut config = basic();
    config.output.chunk_filename = "[id].js".to_string();
    config.resolve = ResolveOptions::new([".js", ".jsx"]);
    config.module = RuleSet::new(vec![script_rule(), style_rule(), image_rule()]);
    config
}

/// `with_loaders` plus the HTML shell generator.
pub fn with_html() -> BuildConfig {
    let html = HtmlPluginOptions {
        template: Some(PathBuf::from("src/index.html")),
        filename: "index.html".to_string(),
        inject: InjectMode::Body,
        title: None,
    };
    with_loaders().with_plugin(html.into_invocation())
}

fn rule(test: &str) -> TransformRule {
    TransformRule::new(test).expect("preset test pattern is a valid regex")
}

fn vendor_excluded(rule: TransformRule) -> TransformRule {
    rule.exclude(VENDOR_EXCLUDE).expect("preset exclude pattern is a valid regex")
}

fn script_rule() -> TransformRule {
    vendor_excluded(rule(SCRIPT_TEST)).then_use(LoaderUse::new("babel-loader"))
}

fn style_rule() -> TransformRule {
    vendor_excluded(rule(STYLE_TEST))
        .then_use(LoaderUse::new("style-loader"))
        .then_use(
            LoaderUse::new("css-loader")
                .with_option("modules", true)
                .with_option("localIdentName", "[name]__[local]__[hash:base64:5]")
                .with_option("importLoaders", 1),
        )
}

fn image_rule() -> TransformRule {
    vendor_excluded(rule(IMAGE_TEST)).then_use(
        LoaderUse::new("url-loader")
            .with_option("limit", json!(8000))
            .with_option("name", "images/[name].[ext]"),
    )
}

/// Named preset, selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    Basic,
    Loaders,
    #[default]
    Html,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Basic, Preset::Loaders, Preset::Html];

    pub fn build(self) -> BuildConfig {
        match self {
            Preset::Basic => basic(),
            Preset::Loaders => with_loaders(),
            Preset::Html => with_html(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Basic => "basic",
            Preset::Loaders => "loaders",
            Preset::Html => "html",
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Preset::Basic),
            "loaders" | "with-loaders" => Ok(Preset::Loaders),
            "html" | "with-html" => Ok(Preset::Html),
            other => Err(format!(
                "unknown preset `{other}`, expected basic, loaders or html"
            )),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Pattern;
    use crate::validation::validate_schema;

    #[test]
    fn every_preset_passes_schema_validation() {
        for preset in Preset::ALL {
            validate_schema(&preset.build()).unwrap();
        }
    }

    #[test]
    fn preset_patterns_compile() {
        for pattern in [SCRIPT_TEST, STYLE_TEST, IMAGE_TEST, VENDOR_EXCLUDE] {
            Pattern::new(pattern).unwrap();
        }
        assert!(Pattern::new(IMAGE_TEST).unwrap().is_match("src/logo.jpeg"));
        assert!(Pattern::new(VENDOR_EXCLUDE).unwrap().is_match("node_modules/react/index.js"));
    }

    #[test]
    fn presets_build_on_each_other() {
        let basic = basic();
        let loaders = with_loaders();
        let html = with_html();

        assert_eq!(loaders.entry, basic.entry);
        assert_eq!(loaders.devtool, basic.devtool);
        assert_eq!(html.module, loaders.module);
        assert!(basic.module.is_empty());
        assert!(loaders.plugins.is_empty());
        assert_eq!(html.plugins.len(), 1);
    }

    #[test]
    fn css_loader_scopes_class_names() {
        let config = with_loaders();
        let css = &config.module.rules[1].chain[1];
        assert_eq!(css.loader, "css-loader");
        assert_eq!(css.options["modules"], json!(true));
        assert_eq!(
            css.options["localIdentName"],
            json!("[name]__[local]__[hash:base64:5]")
        );
        assert_eq!(css.options["importLoaders"], json!(1));
    }

    #[test]
    fn preset_names_parse() {
        for preset in Preset::ALL {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), preset);
        }
        assert!("webpack".parse::<Preset>().is_err());
    }
}
