//! Filename templates such as `[id].js` or `[name].[contenthash:8].js`.
//!
//! Templates are parsed once into literal and placeholder segments, then
//! rendered for every emitted file.

use std::fmt;

use crate::error::{ConfigError, Result};

/// Hash length used when a hash placeholder carries no explicit length.
pub const DEFAULT_HASH_LENGTH: usize = 20;

/// A placeholder recognized inside `[...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Chunk id (`[id]`)
    Id,
    /// Chunk name, falling back to the id (`[name]`)
    Name,
    /// Build-wide hash (`[hash]`)
    Hash,
    /// Per-chunk hash (`[chunkhash]`)
    ChunkHash,
    /// Hash of the emitted content (`[contenthash]`)
    ContentHash,
    /// File extension without the dot (`[ext]`)
    Ext,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Placeholder::Id),
            "name" => Some(Placeholder::Name),
            "hash" | "fullhash" => Some(Placeholder::Hash),
            "chunkhash" => Some(Placeholder::ChunkHash),
            "contenthash" => Some(Placeholder::ContentHash),
            "ext" => Some(Placeholder::Ext),
            _ => None,
        }
    }

    fn is_hash(self) -> bool {
        matches!(
            self,
            Placeholder::Hash | Placeholder::ChunkHash | Placeholder::ContentHash
        )
    }

    /// Whether two different chunks necessarily render this placeholder differently.
    fn distinguishes_chunks(self) -> bool {
        matches!(
            self,
            Placeholder::Id | Placeholder::Name | Placeholder::ChunkHash | Placeholder::ContentHash
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder {
        kind: Placeholder,
        len: Option<usize>,
    },
}

/// Values substituted into a template for one emitted file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkData {
    pub id: String,
    pub name: Option<String>,
    /// Build-wide hash, shared by every file of one build
    pub build_hash: String,
    /// Hash of this file's content
    pub content_hash: String,
    pub ext: String,
}

impl ChunkData {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ext: "js".to_string(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_content_hash(mut self, hash: impl Into<String>) -> Self {
        self.content_hash = hash.into();
        self
    }

    pub fn with_build_hash(mut self, hash: impl Into<String>) -> Self {
        self.build_hash = hash.into();
        self
    }

    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = ext.into();
        self
    }
}

/// A parsed filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl FilenameTemplate {
    /// Parse a template, rejecting unknown or malformed placeholders.
    ///
    /// # Example
    ///
    /// ```
    /// use tack_config::{ChunkData, FilenameTemplate};
    ///
    /// let template = FilenameTemplate::parse("[id].js").unwrap();
    /// assert_eq!(template.render(&ChunkData::new("7")), "7.js");
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = |reason: String| ConfigError::InvalidTemplate {
            field: "template".to_string(),
            template: source.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('[') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find(']')
                .ok_or_else(|| invalid(format!("unterminated placeholder at byte {open}")))?;
            let inner = &after[..close];

            let (name, len) = match inner.split_once(':') {
                Some((name, len)) => {
                    let len: usize = len
                        .parse()
                        .map_err(|_| invalid(format!("invalid length `{len}` in [{inner}]")))?;
                    if len == 0 {
                        return Err(invalid(format!("zero length in [{inner}]")));
                    }
                    (name, Some(len))
                }
                None => (inner, None),
            };

            let kind = Placeholder::parse(name)
                .ok_or_else(|| invalid(format!("unknown placeholder [{name}]")))?;
            if len.is_some() && !kind.is_hash() {
                return Err(invalid(format!("[{name}] does not take a length")));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder { kind, len });
            rest = &after[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Parse a template and attribute any error to `field`.
    pub fn parse_field(source: &str, field: &str) -> Result<Self> {
        Self::parse(source).map_err(|err| match err {
            ConfigError::InvalidTemplate {
                template, reason, ..
            } => ConfigError::InvalidTemplate {
                field: field.to_string(),
                template,
                reason,
            },
            other => other,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { kind, .. } => Some(*kind),
            Segment::Literal(_) => None,
        })
    }

    /// True when two distinct chunks can never render to the same name.
    pub fn is_chunk_unique(&self) -> bool {
        self.placeholders().any(Placeholder::distinguishes_chunks)
    }

    /// Substitute every placeholder.
    pub fn render(&self, chunk: &ChunkData) -> String {
        let mut out = String::with_capacity(self.source.len() + chunk.id.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { kind, len } => match kind {
                    Placeholder::Id => out.push_str(&chunk.id),
                    Placeholder::Name => out.push_str(chunk.name.as_deref().unwrap_or(&chunk.id)),
                    Placeholder::Ext => out.push_str(&chunk.ext),
                    Placeholder::Hash => out.push_str(truncate(&chunk.build_hash, *len)),
                    Placeholder::ChunkHash | Placeholder::ContentHash => {
                        out.push_str(truncate(&chunk.content_hash, *len))
                    }
                },
            }
        }
        out
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn truncate(hash: &str, len: Option<usize>) -> &str {
    let len = len.unwrap_or(DEFAULT_HASH_LENGTH);
    match hash.char_indices().nth(len) {
        Some((idx, _)) => &hash[..idx],
        None => hash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_id_pattern() {
        let template = FilenameTemplate::parse("[id].js").unwrap();
        assert_eq!(template.render(&ChunkData::new("0")), "0.js");
        assert_eq!(template.render(&ChunkData::new("1")), "1.js");
    }

    #[test]
    fn name_falls_back_to_id() {
        let template = FilenameTemplate::parse("[name].chunk.js").unwrap();
        assert_eq!(template.render(&ChunkData::new("3")), "3.chunk.js");
        assert_eq!(
            template.render(&ChunkData::new("3").with_name("vendors")),
            "vendors.chunk.js"
        );
    }

    #[test]
    fn hash_length_truncates() {
        let template = FilenameTemplate::parse("[id].[contenthash:8].js").unwrap();
        let chunk = ChunkData::new("a").with_content_hash("0123456789abcdef");
        assert_eq!(template.render(&chunk), "a.01234567.js");
    }

    #[test]
    fn default_hash_length_is_twenty() {
        let template = FilenameTemplate::parse("[chunkhash]").unwrap();
        let chunk = ChunkData::new("a").with_content_hash("f".repeat(64));
        assert_eq!(template.render(&chunk).len(), DEFAULT_HASH_LENGTH);
    }

    #[test]
    fn ext_placeholder() {
        let template = FilenameTemplate::parse("images/[name].[ext]").unwrap();
        let chunk = ChunkData::new("logo").with_ext("png");
        assert_eq!(template.render(&chunk), "images/logo.png");
    }

    #[test]
    fn rejects_unknown_placeholder() {
        let err = FilenameTemplate::parse("[file].js").unwrap_err();
        assert!(err.to_string().contains("unknown placeholder [file]"));
    }

    #[test]
    fn rejects_unterminated_placeholder() {
        assert!(FilenameTemplate::parse("[id.js").is_err());
    }

    #[test]
    fn rejects_length_on_non_hash() {
        assert!(FilenameTemplate::parse("[id:4].js").is_err());
        assert!(FilenameTemplate::parse("[hash:0].js").is_err());
        assert!(FilenameTemplate::parse("[hash:base64:5].js").is_err());
    }

    #[test]
    fn uniqueness_requires_per_chunk_placeholder() {
        assert!(FilenameTemplate::parse("[id].js").unwrap().is_chunk_unique());
        assert!(FilenameTemplate::parse("[name].js").unwrap().is_chunk_unique());
        assert!(!FilenameTemplate::parse("chunk.js").unwrap().is_chunk_unique());
        assert!(!FilenameTemplate::parse("[hash].js").unwrap().is_chunk_unique());
    }

    #[test]
    fn parse_field_relabels_errors() {
        let err = FilenameTemplate::parse_field("[bogus]", "output.chunkFilename").unwrap_err();
        assert_eq!(err.field(), Some("output.chunkFilename"));
    }

    #[test]
    fn stray_closing_bracket_is_literal() {
        let template = FilenameTemplate::parse("a]b-[id]").unwrap();
        assert_eq!(template.render(&ChunkData::new("1")), "a]b-1");
    }
}
