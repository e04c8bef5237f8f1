//! One build from validated configuration to written output.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tack_config::{BuildConfig, validate_fs};

use crate::emit::{ChunkSource, Emission};
use crate::error::{BuildError, Result};
use crate::plugin::{Plugin, PluginContext, PluginRegistry};
use crate::writer::write_files;

/// Paths written by [`BuildSession::finish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// Bundle, chunks and assets, in emission order
    pub emitted: Vec<PathBuf>,
    /// Files produced by plugins, in plugin order
    pub plugin_outputs: Vec<PathBuf>,
    pub plugins_run: Vec<String>,
}

impl BuildReport {
    /// Every written path.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.emitted.iter().chain(self.plugin_outputs.iter())
    }
}

/// A validated configuration bound to a project root.
///
/// # Example
///
/// ```no_run
/// use tack_build::BuildSession;
/// use tack_config::presets;
///
/// # fn main() -> tack_build::Result<()> {
/// let session = BuildSession::new(presets::with_html(), ".")?;
/// let emission = session.plan("console.log('app')", Vec::new())?;
/// let report = session.finish(emission)?;
/// for path in report.files() {
///     println!("{}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct BuildSession {
    config: BuildConfig,
    root: PathBuf,
    registry: PluginRegistry,
    overwrite: bool,
}

impl BuildSession {
    /// Validate `config` against `root` and instantiate its plugins.
    ///
    /// Nothing is written until [`finish`](Self::finish).
    pub fn new(config: BuildConfig, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        validate_fs(&config, &root)?;
        let registry = PluginRegistry::from_config(&config)?;

        tracing::debug!(
            root = %root.display(),
            plugins = ?registry.names(),
            "build session ready"
        );

        Ok(Self {
            config,
            root,
            registry,
            overwrite: true,
        })
    }

    /// Refuse to replace existing files when `false`.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Append a plugin after the configured ones.
    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) {
        self.registry.register(plugin);
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir(&self.root)
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Name bundle and chunks with this session's output options.
    pub fn plan(&self, bundle: impl Into<Vec<u8>>, chunks: Vec<ChunkSource>) -> Result<Emission> {
        Emission::plan(&self.config.output, bundle, chunks)
    }

    /// Write the emission, run plugins in order, then write their outputs.
    pub fn finish(&self, emission: Emission) -> Result<BuildReport> {
        let output_dir = self.output_dir();
        let emitted = write_files(&output_dir, emission.files(), self.overwrite)?;

        let mut ctx = PluginContext::new(
            &self.config,
            &self.root,
            emission.bundle.file_name.clone(),
            emission.file_names(),
        );
        self.registry.run(&mut ctx)?;
        let outputs = ctx.into_outputs();

        let mut taken: HashSet<String> = emission.file_names().into_iter().collect();
        for output in &outputs {
            if !taken.insert(output.file_name.clone()) {
                return Err(BuildError::DuplicateOutput {
                    file_name: output.file_name.clone(),
                });
            }
        }

        let plugin_outputs = write_files(&output_dir, &outputs, self.overwrite)?;

        tracing::info!(
            dir = %output_dir.display(),
            files = emitted.len() + plugin_outputs.len(),
            "build output written"
        );

        Ok(BuildReport {
            output_dir,
            emitted,
            plugin_outputs,
            plugins_run: self.registry.names().into_iter().map(String::from).collect(),
        })
    }
}
