use std::path::PathBuf;

use tack_config::ConfigError;

/// Error types for tack-build operations.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two emitted files rendered to the same name.
    #[error("chunks `{first}` and `{second}` both render to `{file_name}`")]
    DuplicateChunkFilename {
        file_name: String,
        first: String,
        second: String,
    },

    /// No plugin implementation is registered under this name.
    #[error("unknown plugin `{name}`")]
    UnknownPlugin { name: String },

    /// A plugin output would replace a file already produced by this build.
    #[error("`{file_name}` is produced twice in one build")]
    DuplicateOutput { file_name: String },

    /// HTML template failed to render.
    #[error("failed to render template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    /// Loader options had the wrong shape.
    #[error("invalid option `{option}` for {loader}: {message}")]
    InvalidLoaderOption {
        loader: String,
        option: String,
        message: String,
    },

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Output file already exists and overwrite is disabled.
    #[error("Output exists: {0}")]
    OutputExists(String),

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for tack-build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        BuildError::IoError {
            message: message.into(),
            source,
        }
    }
}

impl miette::Diagnostic for BuildError {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            BuildError::Config(_) => "INVALID_CONFIG",
            BuildError::DuplicateChunkFilename { .. } => "DUPLICATE_CHUNK_FILENAME",
            BuildError::UnknownPlugin { .. } => "UNKNOWN_PLUGIN",
            BuildError::DuplicateOutput { .. } => "DUPLICATE_OUTPUT",
            BuildError::Template { .. } => "TEMPLATE_ERROR",
            BuildError::InvalidLoaderOption { .. } => "INVALID_LOADER_OPTION",
            BuildError::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            BuildError::WriteFailure(_) => "WRITE_FAILURE",
            BuildError::OutputExists(_) => "OUTPUT_EXISTS",
            BuildError::IoError { .. } => "IO_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            BuildError::DuplicateChunkFilename { .. } => Some(Box::new(
                "Include [id], [name] or [chunkhash] in output.chunkFilename",
            )),
            BuildError::UnknownPlugin { name } => Some(Box::new(format!(
                "Known plugins: {}. Remove `{name}` from the plugin list or set enabled = false.",
                tack_config::HTML_PLUGIN_NAMES.join(", ")
            ))),
            BuildError::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Ensure it's within the output directory and doesn't contain '..' components.",
                path
            ))),
            BuildError::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            BuildError::OutputExists(msg) => Some(Box::new(format!(
                "Output file already exists: {}\nUse --overwrite to replace existing files.",
                msg
            ))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn duplicate_chunk_message_names_both_chunks() {
        let err = BuildError::DuplicateChunkFilename {
            file_name: "chunk.js".to_string(),
            first: "0".to_string(),
            second: "1".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("`0`"));
        assert!(message.contains("`1`"));
        assert!(message.contains("chunk.js"));
        assert!(err.help().is_some());
    }

    #[test]
    fn config_errors_pass_through() {
        let err: BuildError = ConfigError::ProfileNotFound("ci".to_string()).into();
        assert_eq!(err.to_string(), "profile not found: ci");
        assert_eq!(err.code().unwrap().to_string(), "INVALID_CONFIG");
    }
}
