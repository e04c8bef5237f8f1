//! Image inlining with `url-loader` semantics.
//!
//! Files at or under the byte limit become base64 data URIs; larger files are
//! emitted under the configured name template and referenced by URL.

use std::path::Path;

use base64::Engine as _;
use base64::prelude::BASE64_STANDARD;
use indexmap::IndexMap;
use serde_json::Value;
use tack_config::{BuildConfig, ChunkData, FilenameTemplate, OutputOptions};

use crate::emit::{EmittedFile, content_hash};
use crate::error::{BuildError, Result};

/// Loader whose options drive inlining.
pub const URL_LOADER: &str = "url-loader";

/// Name template used when the loader sets none.
pub const DEFAULT_ASSET_NAME: &str = "[hash].[ext]";

/// What happened to one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutput {
    /// Small enough to embed; the data URI replaces the import
    Inline(String),
    /// Written next to the bundle and referenced by `url`
    Emit { file_name: String, url: String },
}

impl AssetOutput {
    /// The string the import resolves to.
    pub fn reference(&self) -> &str {
        match self {
            AssetOutput::Inline(uri) => uri,
            AssetOutput::Emit { url, .. } => url,
        }
    }
}

/// How large a file may be and still become a data URI.
///
/// Read from the url-loader `limit` option: a byte count (number or numeric
/// string), `true` or unset to inline everything, `false` to inline nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineLimit {
    Always,
    Never,
    Bytes(u64),
}

impl InlineLimit {
    fn from_option(value: Option<&Value>) -> Result<Self> {
        let limit = match value {
            None | Some(Value::Null) | Some(Value::Bool(true)) => Some(InlineLimit::Always),
            Some(Value::Bool(false)) => Some(InlineLimit::Never),
            Some(Value::Number(n)) => n.as_u64().map(InlineLimit::Bytes),
            Some(Value::String(s)) => s.trim().parse().ok().map(InlineLimit::Bytes),
            Some(_) => None,
        };
        limit.ok_or_else(|| BuildError::InvalidLoaderOption {
            loader: URL_LOADER.to_string(),
            option: "limit".to_string(),
            message: format!(
                "expected a byte count or a boolean, got {}",
                value.map(Value::to_string).unwrap_or_default()
            ),
        })
    }

    pub fn allows(self, size: u64) -> bool {
        match self {
            InlineLimit::Always => true,
            InlineLimit::Never => false,
            InlineLimit::Bytes(limit) => size <= limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssetInliner {
    limit: InlineLimit,
    name: FilenameTemplate,
    output: OutputOptions,
}

impl AssetInliner {
    /// Read `limit` and `name` from a url-loader option map.
    pub fn from_options(options: &IndexMap<String, Value>) -> Result<Self> {
        let limit = InlineLimit::from_option(options.get("limit"))?;

        let name = match options.get("name") {
            None => DEFAULT_ASSET_NAME,
            Some(Value::String(name)) => name.as_str(),
            Some(other) => {
                return Err(BuildError::InvalidLoaderOption {
                    loader: URL_LOADER.to_string(),
                    option: "name".to_string(),
                    message: format!("expected a string, got {other}"),
                });
            }
        };
        let name = FilenameTemplate::parse_field(name, "url-loader.options.name")?;

        Ok(Self {
            limit,
            name,
            output: OutputOptions::default(),
        })
    }

    /// The inliner for `path` under `config`, if a matching rule runs url-loader.
    pub fn for_path(config: &BuildConfig, path: &Path) -> Result<Option<Self>> {
        config
            .module
            .loaders_for(path)
            .into_iter()
            .find(|l| l.loader == URL_LOADER)
            .map(|l| {
                Self::from_options(&l.options).map(|inliner| inliner.with_output(config.output.clone()))
            })
            .transpose()
    }

    /// Emitted assets are referenced through `output.publicPath`.
    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn limit(&self) -> InlineLimit {
        self.limit
    }

    pub fn process(&self, path: &Path, bytes: &[u8]) -> AssetOutput {
        let size = bytes.len() as u64;
        if self.limit.allows(size) {
            let uri = format!(
                "data:{};base64,{}",
                mime_for(path),
                BASE64_STANDARD.encode(bytes)
            );
            tracing::debug!(path = %path.display(), size, "inlined asset");
            return AssetOutput::Inline(uri);
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("asset")
            .to_string();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let hash = content_hash(bytes);

        let data = ChunkData::new(stem.clone())
            .with_name(stem)
            .with_ext(ext)
            .with_build_hash(hash.clone())
            .with_content_hash(hash);
        let file_name = self.name.render(&data);
        let url = self.output.asset_url(&file_name);

        tracing::debug!(path = %path.display(), size, file = %file_name, "emitting asset");
        AssetOutput::Emit { file_name, url }
    }

    /// Process and, for emitted assets, hand back the file to write.
    pub fn process_file(&self, path: &Path, bytes: Vec<u8>) -> (AssetOutput, Option<EmittedFile>) {
        let output = self.process(path, &bytes);
        let file = match &output {
            AssetOutput::Emit { file_name, .. } => Some(EmittedFile::new(file_name.clone(), bytes)),
            AssetOutput::Inline(_) => None,
        };
        (output, file)
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}
