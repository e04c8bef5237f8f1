//! Pluggable config validation strategies
//!
//! Schema validation runs without touching the disk; filesystem validation
//! additionally checks that referenced files exist and the output directory
//! can be written. Every failure names the offending field.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::BuildConfig;
use crate::error::{ConfigError, Result};
use crate::plugin::HtmlPluginOptions;

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &BuildConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use tack_config::{presets, ConfigValidator, SchemaValidator};
///
/// SchemaValidator.validate(&presets::with_html()).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &BuildConfig) -> Result<()> {
        if config.entry.as_os_str().is_empty() {
            return Err(ConfigError::schema_with_hint(
                "entry",
                "entry path cannot be empty",
                "Point `entry` at the script that starts the build, e.g. ./src/index.js",
            ));
        }

        validate_output(config)?;
        validate_extensions(config)?;
        validate_rules(config)?;
        validate_plugins(config)?;

        Ok(())
    }
}

fn validate_output(config: &BuildConfig) -> Result<()> {
    let output = &config.output;

    if output.path.as_os_str().is_empty() {
        return Err(ConfigError::schema("output.path", "output directory cannot be empty"));
    }

    if output.filename.trim().is_empty() {
        return Err(ConfigError::schema_with_hint(
            "output.filename",
            "bundle filename cannot be empty",
            "Use a name such as bundle.js",
        ));
    }
    if escapes_output_dir(&output.filename) {
        return Err(ConfigError::schema(
            "output.filename",
            format!("`{}` would be written outside the output directory", output.filename),
        ));
    }
    output.bundle_template()?;

    let chunks = output.chunk_template()?;
    if !chunks.is_chunk_unique() {
        return Err(ConfigError::schema_with_hint(
            "output.chunkFilename",
            format!("`{}` renders the same name for every chunk", chunks),
            "Include [id], [name], [chunkhash] or [contenthash]",
        ));
    }
    if escapes_output_dir(chunks.as_str()) {
        return Err(ConfigError::schema(
            "output.chunkFilename",
            format!("`{}` would be written outside the output directory", chunks),
        ));
    }

    Ok(())
}

fn validate_extensions(config: &BuildConfig) -> Result<()> {
    let mut seen = HashSet::new();
    for (i, ext) in config.resolve.extensions.iter().enumerate() {
        let field = format!("resolve.extensions[{i}]");
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(ConfigError::schema_with_hint(
                field,
                format!("`{ext}` is not a file extension"),
                "Extensions include the leading dot, e.g. \".jsx\"",
            ));
        }
        if !seen.insert(ext.as_str()) {
            return Err(ConfigError::schema(field, format!("duplicate extension `{ext}`")));
        }
    }
    Ok(())
}

fn validate_rules(config: &BuildConfig) -> Result<()> {
    for (i, rule) in config.module.rules.iter().enumerate() {
        if rule.chain.is_empty() {
            return Err(ConfigError::schema_with_hint(
                format!("module.rules[{i}].use"),
                format!("rule for /{}/ has no loaders", rule.test),
                "Add at least one loader or remove the rule",
            ));
        }
        for (j, loader) in rule.chain.iter().enumerate() {
            if loader.loader.trim().is_empty() {
                return Err(ConfigError::schema(
                    format!("module.rules[{i}].use[{j}].loader"),
                    "loader name cannot be empty",
                ));
            }
        }
    }
    Ok(())
}

fn validate_plugins(config: &BuildConfig) -> Result<()> {
    // Every enabled HTML page lands in the output directory next to the bundle.
    let mut written: HashSet<String> = HashSet::from([output_key(&config.output.filename)]);

    for (i, plugin) in config.plugins.iter().enumerate() {
        if plugin.name.trim().is_empty() {
            return Err(ConfigError::schema(
                format!("plugins[{i}].name"),
                "plugin name cannot be empty",
            ));
        }
        if plugin.is_html() {
            let options = HtmlPluginOptions::from_invocation(plugin).map_err(|err| {
                ConfigError::schema(format!("plugins[{i}].options"), err.to_string())
            })?;
            if escapes_output_dir(&options.filename) {
                return Err(ConfigError::schema(
                    format!("plugins[{i}].options.filename"),
                    format!("`{}` would be written outside the output directory", options.filename),
                ));
            }
            if plugin.enabled && !written.insert(output_key(&options.filename)) {
                return Err(ConfigError::schema_with_hint(
                    format!("plugins[{i}].options.filename"),
                    format!("`{}` is already written by the build", options.filename),
                    "Give each HTML page a filename distinct from output.filename and other pages",
                ));
            }
        }
    }
    Ok(())
}

/// Normalized name of a file inside the output directory.
fn output_key(name: &str) -> String {
    Path::new(name)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Absolute names and `..` components leave the output directory.
fn escapes_output_dir(name: &str) -> bool {
    Path::new(name)
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation first, then checks the entry script, the output
/// directory and the HTML template against the project root.
///
/// # Example
///
/// ```no_run
/// use tack_config::{presets, ConfigValidator, FsValidator};
///
/// FsValidator::new(".").validate(&presets::basic()).unwrap();
/// ```
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &BuildConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        let entry = config.entry_path(&self.root);
        match fs::metadata(&entry) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(ConfigError::EntryNotAFile { path: entry }),
            Err(_) => return Err(ConfigError::EntryNotFound { path: entry }),
        }

        let out_dir = config.output_dir(&self.root);
        if !is_writable_dir(&out_dir) {
            return Err(ConfigError::OutputDirNotWritable { path: out_dir });
        }

        for (_, html) in config.html_plugins()? {
            if let Some(template) = &html.template {
                let path = self.root.join(template);
                if !path.is_file() {
                    return Err(ConfigError::TemplateNotFound { path });
                }
            }
        }

        tracing::debug!(root = %self.root.display(), "configuration validated");
        Ok(())
    }
}

/// An existing writable directory, or a path whose nearest existing
/// ancestor is one.
fn is_writable_dir(path: &Path) -> bool {
    let existing = path.ancestors().find(|p| p.exists());
    match existing {
        Some(dir) => match fs::metadata(dir) {
            Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
            Err(_) => false,
        },
        None => false,
    }
}

/// Convenience function for schema-only validation
pub fn validate_schema(config: &BuildConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience function for filesystem validation
///
/// # Example
///
/// ```no_run
/// use tack_config::{presets, validate_fs};
///
/// validate_fs(&presets::with_html(), ".").unwrap();
/// ```
pub fn validate_fs(config: &BuildConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}
