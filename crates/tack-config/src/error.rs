//! Error types for configuration validation and loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Filesystem validation errors
    #[error("entry not found: {}", .path.display())]
    EntryNotFound { path: PathBuf },

    #[error("entry is not a file: {}", .path.display())]
    EntryNotAFile { path: PathBuf },

    #[error("output directory is not writable: {}", .path.display())]
    OutputDirNotWritable { path: PathBuf },

    #[error("html template not found: {}", .path.display())]
    TemplateNotFound { path: PathBuf },

    // Config parsing/loading errors
    #[error("no tack config found in {}", .root.display())]
    NotFound { root: PathBuf },

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid value for `{field}`{}", hint_suffix(.hint))]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid filename template for `{field}` (`{template}`): {reason}")]
    InvalidTemplate {
        field: String,
        template: String,
        reason: String,
    },

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("invalid profile override: {message}")]
    InvalidProfileOverride { message: String },

    // Schema validation errors (no filesystem checks)
    #[error("`{field}`: {message}{}", hint_suffix(.hint))]
    SchemaValidation {
        field: String,
        message: String,
        hint: Option<String>,
    },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Configuration field the error points at, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::EntryNotFound { .. } | ConfigError::EntryNotAFile { .. } => Some("entry"),
            ConfigError::OutputDirNotWritable { .. } => Some("output.path"),
            ConfigError::InvalidValue { field, .. }
            | ConfigError::InvalidTemplate { field, .. }
            | ConfigError::SchemaValidation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub(crate) fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::SchemaValidation {
            field: field.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub(crate) fn schema_with_hint(
        field: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        ConfigError::SchemaValidation {
            field: field.into(),
            message: message.into(),
            hint: Some(hint.into()),
        }
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({hint})"),
        None => String::new(),
    }
}
