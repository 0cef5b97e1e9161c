//! Final ordering and post-condition checks.

use serde_json::Value;

use ragtree_core::{Chunk, ChunkError, ChunkSource, ChunkingConfig, Result};

use crate::extract::is_prose_bearing;

/// Concatenates structural and prose chunks and checks chunk invariants.
///
/// Structural chunks always come first. Citation numbering downstream relies
/// on that order.
#[derive(Debug, Clone)]
pub struct ChunkAssembler {
    max_structural_size: usize,
    max_prose_size: usize,
}

impl ChunkAssembler {
    pub fn new(max_structural_size: usize, max_prose_size: usize) -> Self {
        Self {
            max_structural_size,
            max_prose_size,
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.max_structural_chunk_size, config.max_prose_chunk_size)
    }

    pub fn assemble(&self, structural: Vec<Chunk>, prose: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut chunks = structural;
        chunks.extend(prose);

        for (index, chunk) in chunks.iter().enumerate() {
            self.check(chunk).map_err(|message| {
                ChunkError::invariant(format!("chunk {} ({}): {}", index, chunk.source, message))
            })?;
        }

        Ok(chunks)
    }

    fn check(&self, chunk: &Chunk) -> std::result::Result<(), String> {
        if chunk.content.is_empty() {
            return Err("empty content".to_string());
        }

        match chunk.source {
            ChunkSource::Structural => {
                if !chunk.header_path.is_empty() {
                    return Err("structural chunk carries a header path".to_string());
                }
                let value: Value = serde_json::from_str(&chunk.content)
                    .map_err(|e| format!("content is not valid JSON: {}", e))?;
                let size = chunk.size();
                // Only a lone scalar may exceed the bound.
                if size > self.max_structural_size && (value.is_object() || value.is_array()) {
                    return Err(format!(
                        "{} chars exceeds structural bound {}",
                        size, self.max_structural_size
                    ));
                }
                if contains_prose(&value) {
                    return Err("structural content holds a prose-bearing string".to_string());
                }
            }
            ChunkSource::Prose => {
                let size = chunk.size();
                if size > self.max_prose_size {
                    return Err(format!(
                        "{} chars exceeds prose bound {}",
                        size, self.max_prose_size
                    ));
                }
            }
        }

        Ok(())
    }
}

fn contains_prose(value: &Value) -> bool {
    match value {
        Value::String(s) => is_prose_bearing(s),
        Value::Array(items) => items.iter().any(contains_prose),
        Value::Object(map) => map.values().any(contains_prose),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}
