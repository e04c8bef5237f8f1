//! Emission and post-build steps for tack.
//!
//! A [`BuildSession`] binds a validated [`tack_config::BuildConfig`] to a
//! project root. The bundler's raw output is named by [`Emission::plan`],
//! written atomically by [`write_files`], and then handed to the configured
//! plugins (currently the HTML shell generator).

pub mod assets;
pub mod emit;
pub mod error;
pub mod html;
pub mod plugin;
pub mod session;
pub mod writer;

pub use assets::{AssetInliner, AssetOutput, InlineLimit, URL_LOADER};
pub use emit::{ChunkSource, Emission, EmittedFile, content_hash, plan_chunk_filenames};
pub use error::{BuildError, Result};
pub use html::{HtmlPlugin, inject_script};
pub use plugin::{Plugin, PluginContext, PluginRegistry};
pub use session::{BuildReport, BuildSession};
pub use writer::write_files;
