use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::helpers::{default_bundle_filename, default_chunk_filename, default_output_dir};
use crate::template::FilenameTemplate;

/// Where and under which names emitted files land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Destination directory (relative paths resolve against the project root)
    #[serde(default = "default_output_dir")]
    pub path: PathBuf,

    /// Primary bundle filename
    #[serde(default = "default_bundle_filename")]
    pub filename: String,

    /// Naming pattern for lazily loaded chunks, e.g. `[id].js`
    #[serde(default = "default_chunk_filename")]
    pub chunk_filename: String,

    /// URL prefix prepended to every asset reference
    #[serde(default)]
    pub public_path: String,
}

impl OutputOptions {
    /// Output directory resolved against `root`.
    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }

    pub fn chunk_template(&self) -> Result<FilenameTemplate> {
        FilenameTemplate::parse_field(&self.chunk_filename, "output.chunkFilename")
    }

    pub fn bundle_template(&self) -> Result<FilenameTemplate> {
        FilenameTemplate::parse_field(&self.filename, "output.filename")
    }

    /// Public URL of an emitted file.
    ///
    /// The prefix is concatenated verbatim; a single slash is kept when both
    /// sides carry one.
    ///
    /// ```
    /// use tack_config::OutputOptions;
    ///
    /// let mut output = OutputOptions::default();
    /// assert_eq!(output.asset_url("bundle.js"), "bundle.js");
    ///
    /// output.public_path = "/static/".to_string();
    /// assert_eq!(output.asset_url("/images/a.png"), "/static/images/a.png");
    /// ```
    pub fn asset_url(&self, file: &str) -> String {
        if self.public_path.ends_with('/') {
            format!("{}{}", self.public_path, file.trim_start_matches('/'))
        } else {
            format!("{}{}", self.public_path, file)
        }
    }

    pub fn bundle_url(&self) -> String {
        self.asset_url(&self.filename)
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            path: default_output_dir(),
            filename: default_bundle_filename(),
            chunk_filename: default_chunk_filename(),
            public_path: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_public_path_leaves_file_untouched() {
        let output = OutputOptions::default();
        assert_eq!(output.bundle_url(), "bundle.js");
    }

    #[test]
    fn cdn_prefix_is_prepended() {
        let output = OutputOptions {
            public_path: "https://cdn.example.com/app/".to_string(),
            ..OutputOptions::default()
        };
        assert_eq!(
            output.asset_url("images/logo.png"),
            "https://cdn.example.com/app/images/logo.png"
        );
    }

    #[test]
    fn prefix_without_trailing_slash_is_verbatim() {
        let output = OutputOptions {
            public_path: "assets-".to_string(),
            ..OutputOptions::default()
        };
        assert_eq!(output.asset_url("bundle.js"), "assets-bundle.js");
    }

    #[test]
    fn dir_joins_root() {
        let output = OutputOptions::default();
        assert_eq!(output.dir(Path::new("/project")), PathBuf::from("/project/dist"));
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(OutputOptions::default()).unwrap();
        assert_eq!(value["chunkFilename"], "[id].js");
        assert_eq!(value["publicPath"], "");
    }
}
