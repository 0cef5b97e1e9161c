//! Chunk types produced by the pipeline.

use serde::{Deserialize, Serialize};

/// Where a chunk's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSource {
    /// Serialized subtree of plain data.
    Structural,
    /// Window of extracted prose text.
    Prose,
}

impl std::fmt::Display for ChunkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Structural => "structural",
            Self::Prose => "prose",
        };
        write!(f, "{}", s)
    }
}

/// One open heading in a prose chunk's header path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Marker depth (1 for `#`, 2 for `##`, ...).
    pub level: usize,

    /// Configured label, e.g. `Header 1`.
    pub label: String,

    /// Heading text.
    pub title: String,
}

/// A bounded piece of a document plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text content. Never empty.
    pub content: String,

    /// Structural or prose.
    pub source: ChunkSource,

    /// Dotted path of the tree position this chunk was drawn from.
    pub key_path: Option<String>,

    /// Enclosing headings, shallowest first. Empty for structural chunks.
    #[serde(default)]
    pub header_path: Vec<Heading>,
}

impl Chunk {
    /// Create a structural chunk.
    pub fn structural(content: String, key_path: Option<String>) -> Self {
        Self {
            content,
            source: ChunkSource::Structural,
            key_path,
            header_path: Vec::new(),
        }
    }

    /// Create a prose chunk.
    pub fn prose(content: String, key_path: Option<String>, header_path: Vec<Heading>) -> Self {
        Self {
            content,
            source: ChunkSource::Prose,
            key_path,
            header_path,
        }
    }

    /// Content size in chars.
    pub fn size(&self) -> usize {
        self.content.chars().count()
    }

    /// Hex-encoded blake3 digest of the content.
    pub fn content_hash(&self) -> String {
        hex::encode(blake3::hash(self.content.as_bytes()).as_bytes())
    }

    /// Title of the open heading with the given label.
    pub fn heading(&self, label: &str) -> Option<&str> {
        self.header_path
            .iter()
            .find(|h| h.label == label)
            .map(|h| h.title.as_str())
    }
}

/// Non-fatal conditions reported alongside the chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkWarning {
    /// A single leaf was larger than the structural bound and was emitted as is.
    OversizedAtomicLeaf {
        key_path: Option<String>,
        size: usize,
        max_size: usize,
    },
}

impl std::fmt::Display for ChunkWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OversizedAtomicLeaf {
                key_path,
                size,
                max_size,
            } => write!(
                f,
                "oversized atomic leaf at {}: {} chars exceeds {}",
                key_path.as_deref().unwrap_or("<root>"),
                size,
                max_size
            ),
        }
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkedDocument {
    /// Structural chunks first, then prose chunks.
    pub chunks: Vec<Chunk>,

    /// Degraded-but-accepted conditions.
    pub warnings: Vec<ChunkWarning>,
}

impl ChunkedDocument {
    /// Iterate chunks of one source.
    pub fn by_source(&self, source: ChunkSource) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().filter(move |c| c.source == source)
    }
}

/// A search hit returned by an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The matched chunk.
    pub chunk: Chunk,

    /// Relevance score (higher is better).
    pub score: f32,
}
