//! Post-build plugin seam.
//!
//! Plugins run once, in configuration order, after the bundle and chunks have
//! been written. They see the configuration and the emitted file names and may
//! queue extra outputs, which the session writes after the last plugin.

use std::path::{Path, PathBuf};

use tack_config::{BuildConfig, PluginInvocation};

use crate::emit::EmittedFile;
use crate::error::{BuildError, Result};
use crate::html::HtmlPlugin;

/// A post-build step.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn apply(&self, ctx: &mut PluginContext<'_>) -> Result<()>;
}

/// What a plugin can see and produce.
pub struct PluginContext<'a> {
    config: &'a BuildConfig,
    root: &'a Path,
    bundle: String,
    emitted: Vec<String>,
    outputs: Vec<EmittedFile>,
}

impl<'a> PluginContext<'a> {
    pub fn new(
        config: &'a BuildConfig,
        root: &'a Path,
        bundle: impl Into<String>,
        emitted: Vec<String>,
    ) -> Self {
        Self {
            config,
            root,
            bundle: bundle.into(),
            emitted,
            outputs: Vec::new(),
        }
    }

    pub fn config(&self) -> &'a BuildConfig {
        self.config
    }

    /// Project root that relative config paths resolve against.
    pub fn root(&self) -> &'a Path {
        self.root
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir(self.root)
    }

    /// File name of the primary bundle, relative to the output directory.
    pub fn bundle_file_name(&self) -> &str {
        &self.bundle
    }

    /// Every file written before plugins ran, bundle first.
    pub fn emitted_files(&self) -> &[String] {
        &self.emitted
    }

    /// Queue an extra output file.
    pub fn emit(&mut self, file: EmittedFile) {
        self.outputs.push(file);
    }

    pub fn outputs(&self) -> &[EmittedFile] {
        &self.outputs
    }

    pub fn into_outputs(self) -> Vec<EmittedFile> {
        self.outputs
    }
}

/// Plugins in execution order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate every enabled invocation, keeping list order.
    pub fn from_invocations(invocations: &[PluginInvocation]) -> Result<Self> {
        let mut registry = Self::new();
        for invocation in invocations {
            if !invocation.enabled {
                tracing::debug!(plugin = %invocation.name, "skipping disabled plugin");
                continue;
            }
            registry.register(instantiate(invocation)?);
        }
        Ok(registry)
    }

    pub fn from_config(config: &BuildConfig) -> Result<Self> {
        Self::from_invocations(&config.plugins)
    }

    /// Append a plugin; it runs after every plugin already registered.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run every plugin against `ctx`, stopping at the first failure.
    pub fn run(&self, ctx: &mut PluginContext<'_>) -> Result<()> {
        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), "running plugin");
            plugin.apply(ctx)?;
        }
        Ok(())
    }
}

fn instantiate(invocation: &PluginInvocation) -> Result<Box<dyn Plugin>> {
    if invocation.is_html() {
        return Ok(Box::new(HtmlPlugin::from_invocation(invocation)?));
    }
    Err(BuildError::UnknownPlugin {
        name: invocation.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Plugin for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn apply(&self, ctx: &mut PluginContext<'_>) -> Result<()> {
            self.log.lock().unwrap().push(self.name.to_string());
            ctx.emit(EmittedFile::new(format!("{}.txt", self.name), ctx.bundle_file_name()));
            Ok(())
        }
    }

    #[test]
    fn unknown_plugin_is_rejected() {
        let err = PluginRegistry::from_invocations(&[PluginInvocation::new("copy-webpack-plugin")])
            .err()
            .unwrap();
        assert!(matches!(err, BuildError::UnknownPlugin { name } if name == "copy-webpack-plugin"));
    }

    #[test]
    fn disabled_plugins_are_skipped() {
        let mut unknown = PluginInvocation::new("not-installed");
        unknown.enabled = false;
        let registry =
            PluginRegistry::from_invocations(&[unknown, PluginInvocation::new("html")]).unwrap();
        assert_eq!(registry.names(), vec!["html"]);
    }

    #[test]
    fn plugins_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        for name in ["first", "second", "third"] {
            registry.register(Box::new(Recorder {
                name,
                log: Arc::clone(&log),
            }));
        }

        let config = BuildConfig::default();
        let mut ctx = PluginContext::new(&config, Path::new("."), "bundle.js", vec!["bundle.js".into()]);
        registry.run(&mut ctx).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
        let outputs = ctx.into_outputs();
        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].contents, b"bundle.js");
    }
}
