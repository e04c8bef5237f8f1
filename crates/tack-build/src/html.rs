//! HTML shell generation.
//!
//! Renders the configured template (or a built-in shell) and injects a script
//! tag for the emitted bundle.

use std::fs;
use std::path::PathBuf;

use minijinja::{Environment, context};
use tack_config::{HtmlPluginOptions, InjectMode, PluginInvocation};

use crate::emit::EmittedFile;
use crate::error::{BuildError, Result};
use crate::plugin::{Plugin, PluginContext};

const DEFAULT_TITLE: &str = "tack app";

const DEFAULT_SHELL: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{{ title }}</title>
  </head>
  <body>
  </body>
</html>
"#;

#[derive(Debug, Clone)]
pub struct HtmlPlugin {
    name: String,
    options: HtmlPluginOptions,
}

impl HtmlPlugin {
    pub fn new(options: HtmlPluginOptions) -> Self {
        Self {
            name: "html".to_string(),
            options,
        }
    }

    pub fn from_invocation(invocation: &PluginInvocation) -> Result<Self> {
        Ok(Self {
            name: invocation.name.clone(),
            options: HtmlPluginOptions::from_invocation(invocation)?,
        })
    }

    pub fn options(&self) -> &HtmlPluginOptions {
        &self.options
    }

    fn template_source(&self, ctx: &PluginContext<'_>) -> Result<(PathBuf, String)> {
        match &self.options.template {
            Some(template) => {
                let path = ctx.root().join(template);
                let source = fs::read_to_string(&path).map_err(|e| {
                    BuildError::io(format!("Failed to read HTML template: {}", path.display()), e)
                })?;
                Ok((path, source))
            }
            None => Ok((PathBuf::from("<built-in shell>"), DEFAULT_SHELL.to_string())),
        }
    }
}

impl Plugin for HtmlPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, ctx: &mut PluginContext<'_>) -> Result<()> {
        let (path, source) = self.template_source(ctx)?;

        let output = &ctx.config().output;
        let bundle = ctx.bundle_file_name().to_string();
        let bundle_url = output.asset_url(&bundle);
        let chunks: Vec<&str> = ctx
            .emitted_files()
            .iter()
            .skip(1)
            .map(String::as_str)
            .collect();

        let env = Environment::new();
        let rendered = env
            .render_str(
                &source,
                context! {
                    title => self.options.title.as_deref().unwrap_or(DEFAULT_TITLE),
                    public_path => &output.public_path,
                    bundle => &bundle,
                    bundle_url => &bundle_url,
                    chunks => chunks,
                },
            )
            .map_err(|source| BuildError::Template {
                path: path.clone(),
                source,
            })?;

        let tag = script_tag(&bundle_url);
        let html = inject_script(&rendered, &tag, self.options.inject);

        tracing::debug!(
            template = %path.display(),
            file = %self.options.filename,
            "rendered html shell"
        );
        ctx.emit(EmittedFile::new(self.options.filename.clone(), html));
        Ok(())
    }
}

fn script_tag(src: &str) -> String {
    format!(r#"<script src="{src}"></script>"#)
}

/// Insert `tag` before the last `</body>` (or `</head>`), appending when the
/// closing tag is missing.
pub fn inject_script(html: &str, tag: &str, mode: InjectMode) -> String {
    let marker = match mode {
        InjectMode::Disabled => return html.to_string(),
        InjectMode::Body => "</body>",
        InjectMode::Head => "</head>",
    };

    if let Some(pos) = html.rfind(marker) {
        let mut result = String::with_capacity(html.len() + tag.len() + 4);
        result.push_str(&html[..pos]);
        result.push_str("  ");
        result.push_str(tag);
        result.push('\n');
        result.push_str(&html[pos..]);
        return result;
    }

    let mut result = html.to_string();
    if !result.ends_with('\n') {
        result.push('\n');
    }
    result.push_str(tag);
    result.push('\n');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tack_config::BuildConfig;

    fn run(plugin: &HtmlPlugin, config: &BuildConfig) -> Vec<EmittedFile> {
        let mut ctx = PluginContext::new(config, Path::new("."), "bundle.js", vec!["bundle.js".into()]);
        plugin.apply(&mut ctx).unwrap();
        ctx.into_outputs()
    }

    #[test]
    fn inject_before_body() {
        let html = "<html><body><h1>Test</h1></body></html>";
        let result = inject_script(html, "<script src=\"a.js\"></script>", InjectMode::Body);
        assert!(result.contains("<h1>Test</h1>  <script src=\"a.js\"></script>\n</body>"));
    }

    #[test]
    fn inject_into_head() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let result = inject_script(html, "<script></script>", InjectMode::Head);
        let script = result.find("<script>").unwrap();
        assert!(script < result.find("</head>").unwrap());
    }

    #[test]
    fn inject_appends_without_body() {
        let result = inject_script("<p>fragment</p>", "<script></script>", InjectMode::Body);
        assert_eq!(result, "<p>fragment</p>\n<script></script>\n");
    }

    #[test]
    fn inject_disabled_leaves_html_alone() {
        let html = "<body></body>";
        assert_eq!(inject_script(html, "<script></script>", InjectMode::Disabled), html);
    }

    #[test]
    fn built_in_shell_references_bundle() {
        let mut config = BuildConfig::default();
        config.output.public_path = "/assets/".to_string();
        let plugin = HtmlPlugin::new(HtmlPluginOptions {
            title: Some("Demo".to_string()),
            ..HtmlPluginOptions::default()
        });

        let outputs = run(&plugin, &config);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].file_name, "index.html");

        let html = String::from_utf8(outputs[0].contents.clone()).unwrap();
        assert!(html.contains("<title>Demo</title>"));
        assert!(html.contains(r#"<script src="/assets/bundle.js"></script>"#));
    }

    #[test]
    fn missing_template_is_an_io_error() {
        let plugin = HtmlPlugin::new(HtmlPluginOptions {
            template: Some(PathBuf::from("does/not/exist.html")),
            ..HtmlPluginOptions::default()
        });
        let config = BuildConfig::default();
        let mut ctx = PluginContext::new(&config, Path::new("."), "bundle.js", Vec::new());
        let err = plugin.apply(&mut ctx).unwrap_err();
        assert!(matches!(err, BuildError::IoError { .. }));
    }
}
