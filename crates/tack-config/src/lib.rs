//! Typed build configuration for the tack bundler front-end.
//!
//! The record is constructed once (from a [`presets`] function, a config
//! file, or a JSON value), validated eagerly, and never mutated during a
//! build.

pub mod config;
pub mod devtool;
pub mod discovery;
pub mod error;
pub mod output;
pub mod plugin;
pub mod presets;
pub mod resolve;
pub mod rules;
pub mod template;
pub mod validation;

mod helpers;

// Re-export main types
pub use config::{BuildConfig, Mode};
pub use devtool::SourceMapMode;
pub use error::{ConfigError, Result};
pub use output::OutputOptions;
pub use plugin::{HtmlPluginOptions, InjectMode, PluginInvocation, HTML_PLUGIN_NAMES};
pub use presets::Preset;
pub use resolve::ResolveOptions;
pub use rules::{LoaderUse, Pattern, RuleSet, TransformRule};
pub use template::{ChunkData, FilenameTemplate, Placeholder, DEFAULT_HASH_LENGTH};

// Re-export discovery and validation
pub use discovery::{discover, discover_with_profile, ConfigDiscovery, ENV_PREFIX};
pub use validation::{validate_fs, validate_schema, ConfigValidator, FsValidator, SchemaValidator};
