//! Extension resolution for extensionless imports.
//!
//! Candidates are tried in configuration order: the request as-is, then the
//! request with each extension appended, then `index` + each extension inside
//! the request directory. The first existing file wins.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::helpers::default_extensions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Ordered extension suffixes, each including the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl ResolveOptions {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Candidate paths for `request`, in the order they are tried.
    pub fn candidates(&self, request: &str) -> Vec<String> {
        let mut candidates = Vec::with_capacity(1 + self.extensions.len() * 2);
        candidates.push(request.to_string());
        for ext in &self.extensions {
            candidates.push(format!("{request}{ext}"));
        }
        let dir = request.trim_end_matches('/');
        for ext in &self.extensions {
            candidates.push(format!("{dir}/index{ext}"));
        }
        candidates
    }

    /// Resolve `request` relative to `base_dir`.
    pub fn resolve_request(&self, base_dir: &Path, request: &str) -> Option<PathBuf> {
        let found = self
            .candidates(request)
            .into_iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.is_file());

        match &found {
            Some(path) => tracing::debug!(request, resolved = %path.display(), "resolved import"),
            None => tracing::debug!(request, base = %base_dir.display(), "import unresolved"),
        }
        found
    }

    /// Whether a path carries one of the configured extensions.
    pub fn is_resolvable(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}
