//! Emission planning: final names for the bundle, chunks and assets.
//!
//! The external bundler hands over raw bundle and chunk contents; this module
//! hashes them, renders the configured filename templates, and rejects any
//! plan where two chunks would land on the same file.

use std::collections::HashMap;
use std::fmt;

use sha2::{Digest, Sha256};
use tack_config::{ChunkData, FilenameTemplate, OutputOptions};

use crate::error::{BuildError, Result};

/// Chunk id used when rendering the primary bundle name.
pub const MAIN_CHUNK_ID: &str = "main";

/// Hash content using SHA-256.
///
/// Returns hex-encoded hash (64 characters).
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// One file ready to be written under the output directory.
#[derive(Clone, PartialEq, Eq)]
pub struct EmittedFile {
    /// Path relative to the output directory, forward slashes
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl EmittedFile {
    pub fn new(file_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl fmt::Debug for EmittedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmittedFile")
            .field("file_name", &self.file_name)
            .field("len", &self.contents.len())
            .finish()
    }
}

/// A lazily loaded chunk as produced by the bundler, before naming.
#[derive(Debug, Clone)]
pub struct ChunkSource {
    pub id: String,
    pub name: Option<String>,
    pub contents: Vec<u8>,
}

impl ChunkSource {
    pub fn new(id: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            name: None,
            contents: contents.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Render `template` for every chunk, failing on the first collision.
pub fn plan_chunk_filenames(
    template: &FilenameTemplate,
    chunks: &[ChunkData],
) -> Result<Vec<String>> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(chunks.len());
    let mut names = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        let file_name = template.render(chunk);
        if let Some(first) = seen.insert(file_name.clone(), chunk.id.as_str()) {
            return Err(BuildError::DuplicateChunkFilename {
                file_name,
                first: first.to_string(),
                second: chunk.id.clone(),
            });
        }
        names.push(file_name);
    }

    Ok(names)
}

/// Everything one build writes before plugins run.
#[derive(Debug, Clone)]
pub struct Emission {
    pub bundle: EmittedFile,
    pub chunks: Vec<EmittedFile>,
    pub assets: Vec<EmittedFile>,
    /// Hash over every planned file, substituted for `[hash]`
    pub build_hash: String,
}

impl Emission {
    /// Name the bundle and chunks according to `output`.
    ///
    /// # Example
    ///
    /// ```
    /// use tack_build::{ChunkSource, Emission};
    /// use tack_config::OutputOptions;
    ///
    /// let emission = Emission::plan(
    ///     &OutputOptions::default(),
    ///     "console.log('main')",
    ///     vec![ChunkSource::new("0", "/* lazy */")],
    /// )
    /// .unwrap();
    /// assert_eq!(emission.bundle.file_name, "bundle.js");
    /// assert_eq!(emission.chunks[0].file_name, "0.js");
    /// ```
    pub fn plan(
        output: &OutputOptions,
        bundle: impl Into<Vec<u8>>,
        chunks: Vec<ChunkSource>,
    ) -> Result<Self> {
        let bundle = bundle.into();
        let build_hash = build_hash(&bundle, &chunks);

        let bundle_name = output.bundle_template()?.render(
            &ChunkData::new(MAIN_CHUNK_ID)
                .with_build_hash(build_hash.clone())
                .with_content_hash(content_hash(&bundle)),
        );

        let data: Vec<ChunkData> = chunks
            .iter()
            .map(|chunk| {
                let mut data = ChunkData::new(chunk.id.clone())
                    .with_build_hash(build_hash.clone())
                    .with_content_hash(content_hash(&chunk.contents));
                data.name = chunk.name.clone();
                data
            })
            .collect();
        let names = plan_chunk_filenames(&output.chunk_template()?, &data)?;

        if let Some(pos) = names.iter().position(|name| *name == bundle_name) {
            return Err(BuildError::DuplicateChunkFilename {
                file_name: bundle_name,
                first: MAIN_CHUNK_ID.to_string(),
                second: chunks[pos].id.clone(),
            });
        }

        tracing::debug!(bundle = %bundle_name, chunks = names.len(), "planned emission");

        Ok(Self {
            bundle: EmittedFile::new(bundle_name, bundle),
            chunks: names
                .into_iter()
                .zip(chunks)
                .map(|(name, chunk)| EmittedFile::new(name, chunk.contents))
                .collect(),
            assets: Vec::new(),
            build_hash,
        })
    }

    pub fn with_asset(mut self, asset: EmittedFile) -> Self {
        self.assets.push(asset);
        self
    }

    /// Bundle first, then chunks, then assets.
    pub fn files(&self) -> impl Iterator<Item = &EmittedFile> {
        std::iter::once(&self.bundle)
            .chain(self.chunks.iter())
            .chain(self.assets.iter())
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files().map(|f| f.file_name.clone()).collect()
    }
}

fn build_hash(bundle: &[u8], chunks: &[ChunkSource]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bundle);
    for chunk in chunks {
        hasher.update(chunk.id.as_bytes());
        hasher.update(&chunk.contents);
    }
    format!("{:x}", hasher.finalize())
}
