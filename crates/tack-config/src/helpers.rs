use std::path::PathBuf;

// Helper defaults
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_entry() -> PathBuf {
    PathBuf::from("./src/index.js")
}

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub(crate) fn default_bundle_filename() -> String {
    "bundle.js".to_string()
}

pub(crate) fn default_chunk_filename() -> String {
    "[id].js".to_string()
}

pub(crate) fn default_extensions() -> Vec<String> {
    vec![".js".to_string()]
}

pub(crate) fn default_html_filename() -> String {
    "index.html".to_string()
}
