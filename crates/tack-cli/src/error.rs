//! Error handling for the tack CLI.
//!
//! Library errors (`ConfigError`, `BuildError`) convert into [`CliError`]
//! through `#[from]`; `main` renders the final error with miette.

mod report;

use std::path::PathBuf;

use tack_build::BuildError;
use tack_config::ConfigError;
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading or validating the configuration failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Emission, writing or a plugin failed
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No resolution candidate exists on disk
    #[error("cannot resolve `{request}` from {}", .from.display())]
    Unresolved {
        request: String,
        from: PathBuf,
        tried: Vec<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Attach context to fallible operations.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    ///
    /// ```rust,no_run
    /// # use std::path::Path;
    /// # use tack_cli::error::{Result, ResultExt};
    /// # fn run() -> Result<()> {
    /// let path = Path::new("dist/bundle.js");
    /// std::fs::read(path).with_path(path)?;
    /// # Ok(())
    /// # }
    /// ```
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }}
