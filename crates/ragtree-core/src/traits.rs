//! Core traits defining the interfaces between components.

use async_trait::async_trait;

use crate::error::Result;
use crate::node::Node;
use crate::types::{Chunk, ChunkedDocument, ScoredChunk};

/// Turns one document tree into an ordered chunk sequence.
///
/// Implementations are pure: identical input yields identical output.
pub trait DocumentChunker: Send + Sync {
    fn chunk(&self, document: &Node) -> Result<ChunkedDocument>;
}

/// Indexing collaborator that embeds and stores chunks.
#[async_trait]
pub trait ChunkIndex: Send + Sync {
    /// Ingest chunks.
    async fn index(&self, chunks: &[Chunk]) -> Result<()>;

    /// Top-k similarity retrieval, best match first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>>;
}
