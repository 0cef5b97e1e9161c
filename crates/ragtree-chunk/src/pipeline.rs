//! Chunking pipeline that routes a document through the splitters.

use tracing::{debug, info};

use ragtree_core::{
    ChunkError, ChunkIndex, ChunkSource, ChunkedDocument, ChunkingConfig, DocumentChunker, Node,
    Result,
};

use crate::{ChunkAssembler, MarkdownExtractor, ProseEntry, ProseSplitter, StructuralSplitter};

/// Single-pass chunker for one document tree.
///
/// Mappings are split into structural chunks for their plain data and prose
/// chunks for their markdown leaves. A root-level string is treated as one
/// prose document. Any other root kind is rejected.
///
/// The pipeline holds no mutable state, so one instance can chunk many
/// documents from several threads at once.
#[derive(Debug, Clone)]
pub struct ChunkPipeline {
    config: ChunkingConfig,
    extractor: MarkdownExtractor,
    structural: StructuralSplitter,
    prose: ProseSplitter,
    assembler: ChunkAssembler,
}

impl ChunkPipeline {
    /// Create a pipeline, rejecting an invalid configuration up front.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            extractor: MarkdownExtractor::new(),
            structural: StructuralSplitter::new(config.max_structural_chunk_size),
            prose: ProseSplitter::from_config(&config)?,
            assembler: ChunkAssembler::from_config(&config),
            config,
        })
    }

    /// Create a pipeline with the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ChunkingConfig::default())
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk one document.
    pub fn chunk(&self, document: &Node) -> Result<ChunkedDocument> {
        let output = match document {
            Node::Mapping(_) => self.chunk_mapping(document)?,
            Node::String(text) => self.chunk_text(text)?,
            other => return Err(ChunkError::unsupported_kind(other.kind())),
        };

        info!(
            structural = output.by_source(ChunkSource::Structural).count(),
            prose = output.by_source(ChunkSource::Prose).count(),
            warnings = output.warnings.len(),
            "Chunked document"
        );

        Ok(output)
    }

    fn chunk_mapping(&self, document: &Node) -> Result<ChunkedDocument> {
        let (entries, cleaned) = self.extractor.extract(document);
        debug!("Extracted {} prose entries", entries.len());

        let structural = self.structural.split(&cleaned)?;
        debug!("Structural splitter produced {} chunks", structural.chunks.len());

        let prose = self.prose.split(&entries);
        debug!("Prose splitter produced {} chunks", prose.len());

        Ok(ChunkedDocument {
            chunks: self.assembler.assemble(structural.chunks, prose)?,
            warnings: structural.warnings,
        })
    }

    fn chunk_text(&self, text: &str) -> Result<ChunkedDocument> {
        let entry = ProseEntry {
            key_path: String::new(),
            text: text.to_string(),
        };
        let prose = self.prose.split(std::slice::from_ref(&entry));
        debug!("Prose splitter produced {} chunks", prose.len());

        Ok(ChunkedDocument {
            chunks: self.assembler.assemble(Vec::new(), prose)?,
            warnings: Vec::new(),
        })
    }
}

impl DocumentChunker for ChunkPipeline {
    fn chunk(&self, document: &Node) -> Result<ChunkedDocument> {
        ChunkPipeline::chunk(self, document)
    }
}

/// Chunk a document and hand the chunks to an index.
///
/// Nothing is indexed if chunking fails. The returned document carries any
/// warnings raised while chunking.
pub async fn ingest<C, I>(chunker: &C, index: &I, document: &Node) -> Result<ChunkedDocument>
where
    C: DocumentChunker + ?Sized,
    I: ChunkIndex + ?Sized,
{
    let output = chunker.chunk(document)?;

    info!("Indexing {} chunks", output.chunks.len());
    index.index(&output.chunks).await?;

    Ok(output)
}
