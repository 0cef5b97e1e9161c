//! ragtree-chunk - Document tree chunking
//!
//! This crate splits parsed API specifications (nested key/value trees with
//! markdown embedded in string leaves) into bounded chunks that remember
//! where they came from.
//!
//! # Stages
//!
//! - [`MarkdownExtractor`]: lifts markdown-looking string leaves out of the
//!   tree, recording each one's dotted key path.
//!
//! - [`StructuralSplitter`]: cuts the remaining tree into JSON fragments no
//!   larger than a size bound.
//!
//! - [`ProseSplitter`]: segments the lifted text by headings, then cuts it
//!   into overlapping windows.
//!
//! - [`ChunkAssembler`]: orders structural chunks before prose chunks and
//!   checks every chunk's invariants.
//!
//! [`ChunkPipeline`] runs all four.
//!
//! # Example
//!
//! ```rust
//! use ragtree_chunk::{ChunkPipeline, Node};
//!
//! let pipeline = ChunkPipeline::with_defaults().unwrap();
//! let doc = Node::from_json_str(r##"{"title": "Example", "description": "# Header\nSome content"}"##).unwrap();
//! let output = pipeline.chunk(&doc).unwrap();
//! assert_eq!(output.chunks.len(), 2);
//! ```

mod assemble;
mod extract;
mod pipeline;
mod prose;
mod structural;

pub use assemble::ChunkAssembler;
pub use extract::{is_prose_bearing, MarkdownExtractor, ProseEntry};
pub use pipeline::{ingest, ChunkPipeline};
pub use prose::ProseSplitter;
pub use structural::StructuralSplitter;

// Re-export types for convenience
pub use ragtree_core::{
    Chunk, ChunkError, ChunkIndex, ChunkSource, ChunkWarning, ChunkedDocument, ChunkingConfig,
    DocumentChunker, HeaderMarker, Heading, Node, Result, ScoredChunk,
};
