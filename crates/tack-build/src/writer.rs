//! Atomic file writing for build output.
//!
//! Every target path is normalized and must stay inside the output directory.
//! Files are written to `<name>.tmp` siblings first and renamed into place
//! once all of them have been written; on any failure the temporary files are
//! removed.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::emit::EmittedFile;
use crate::error::{BuildError, Result};

/// Writes files under `dir` with traversal checks and atomic renames.
///
/// Returns the absolute paths written, in input order.
///
/// # Errors
///
/// - a file name escapes `dir` or contains a null byte
/// - a target exists and `overwrite` is `false`
/// - any I/O operation fails
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use tack_build::{write_files, EmittedFile};
///
/// # fn example() -> tack_build::Result<()> {
/// let files = [EmittedFile::new("bundle.js", "console.log(1)")];
/// write_files(Path::new("dist"), &files, true)?;
/// # Ok(())
/// # }
/// ```
pub fn write_files<'a, I>(dir: &Path, files: I, overwrite: bool) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = &'a EmittedFile>,
{
    let dir = normalize_dir(dir)?;

    fs::create_dir_all(&dir).map_err(|e| {
        BuildError::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut operations = Vec::new();
    for file in files {
        let target_path = validate_output_path(&dir, &file.file_name)?;

        if !overwrite && target_path.exists() {
            return Err(BuildError::OutputExists(format!(
                "File already exists: '{}'. Use overwrite=true to replace.",
                target_path.display()
            )));
        }

        operations.push((target_path, file.contents.as_slice()));
    }

    write_files_atomic(&operations)?;

    for (path, contents) in &operations {
        tracing::info!(path = %path.display(), bytes = contents.len(), "wrote file");
    }
    Ok(operations.into_iter().map(|(path, _)| path).collect())
}

/// Resolve `.` and `..` and make the directory absolute.
fn normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();

    if cleaned.is_absolute() {
        return Ok(cleaned);
    }

    let cwd = std::env::current_dir().map_err(|e| {
        BuildError::InvalidOutputPath(format!("Failed to get current directory: {}", e))
    })?;
    Ok(cwd.join(&cleaned).clean())
}

/// The cleaned `base_dir/filename`, provided it stays under `base_dir`.
pub(crate) fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(BuildError::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }
    if filename.is_empty() {
        return Err(BuildError::InvalidOutputPath(
            "Filename is empty".to_string(),
        ));
    }

    let filename_path = Path::new(filename).clean();
    let full_path = base_dir.join(&filename_path).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(BuildError::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Two-phase write: every temp file first, then the renames.
fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files = Vec::new();

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                BuildError::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(target_path);
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            BuildError::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    for (temp_path, target_path) in &temp_files {
        fs::rename(temp_path, target_path).map_err(|e| {
            cleanup_temp_files(&temp_files);
            BuildError::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                target_path.display(),
                e
            ))
        })?;
    }

    Ok(())
}

/// Best effort; we are already failing.
fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "failed to clean up temporary file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn validate_output_path_normal() {
        let base = Path::new("/tmp/output");
        let result = validate_output_path(base, "index.js").unwrap();
        assert_eq!(result, Path::new("/tmp/output/index.js"));
    }

    #[test]
    fn validate_output_path_nested() {
        let base = Path::new("/tmp/output");
        let result = validate_output_path(base, "images/logo.png").unwrap();
        assert_eq!(result, Path::new("/tmp/output/images/logo.png"));
    }

    #[test]
    fn validate_output_path_traversal() {
        let base = Path::new("/tmp/output");
        for name in ["../etc/passwd", "safe/../../../../etc/passwd", ".", ""] {
            assert!(
                matches!(
                    validate_output_path(base, name),
                    Err(BuildError::InvalidOutputPath(_))
                ),
                "{name:?}"
            );
        }
    }

    #[test]
    fn validate_output_path_null_byte() {
        let base = Path::new("/tmp/output");
        assert!(validate_output_path(base, "file\0name.js").is_err());
    }

    #[test]
    fn validate_output_path_current_dir() {
        let base = Path::new("/tmp/output");
        let result = validate_output_path(base, "./index.js").unwrap();
        assert_eq!(result, Path::new("/tmp/output/index.js"));
    }

    #[test]
    fn writes_nested_files_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");
        let files = [
            EmittedFile::new("bundle.js", "main"),
            EmittedFile::new("images/logo.png", vec![1, 2]),
        ];

        let written = write_files(&out, &files, false).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(fs::read_to_string(out.join("bundle.js")).unwrap(), "main");
        assert_eq!(fs::read(out.join("images/logo.png")).unwrap(), vec![1, 2]);
        assert!(!out.join("bundle.js.tmp").exists());
    }

    #[test]
    fn refuses_to_overwrite_when_disabled() {
        let dir = TempDir::new().unwrap();
        let files = [EmittedFile::new("bundle.js", "v1")];
        write_files(dir.path(), &files, false).unwrap();

        let err = write_files(dir.path(), &[EmittedFile::new("bundle.js", "v2")], false).unwrap_err();
        assert!(matches!(err, BuildError::OutputExists(_)));
        assert_eq!(fs::read_to_string(dir.path().join("bundle.js")).unwrap(), "v1");

        write_files(dir.path(), &[EmittedFile::new("bundle.js", "v2")], true).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("bundle.js")).unwrap(), "v2");
    }

    #[test]
    fn traversal_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let files = [
            EmittedFile::new("bundle.js", "ok"),
            EmittedFile::new("../escape.js", "bad"),
        ];
        assert!(write_files(dir.path(), &files, true).is_err());
        assert!(!dir.path().join("bundle.js").exists());
    }
}
