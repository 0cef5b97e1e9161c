//! Configuration types for the chunking pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{ChunkError, Result};

/// Main configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagTreeConfig {
    /// Chunking configuration.
    #[serde(default)]
    pub chunking: ChunkingConfig,
}

/// Chunking configuration.
///
/// All sizes are counted in chars. Structural sizes are measured on the
/// compact JSON serialization of a subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum serialized size of a structural chunk.
    #[serde(default = "default_max_structural_chunk_size")]
    pub max_structural_chunk_size: usize,

    /// Maximum size of a prose chunk.
    #[serde(default = "default_max_prose_chunk_size")]
    pub max_prose_chunk_size: usize,

    /// Chars repeated at the start of the next prose window.
    #[serde(default = "default_prose_overlap")]
    pub prose_overlap: usize,

    /// Separators tried in priority order when closing a prose window.
    #[serde(default = "default_prose_separators")]
    pub prose_separators: Vec<String>,

    /// Recognized heading markers.
    #[serde(default = "default_header_markers")]
    pub header_markers: Vec<HeaderMarker>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_structural_chunk_size: default_max_structural_chunk_size(),
            max_prose_chunk_size: default_max_prose_chunk_size(),
            prose_overlap: default_prose_overlap(),
            prose_separators: default_prose_separators(),
            header_markers: default_header_markers(),
        }
    }
}

/// A heading marker and the label its titles are reported under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMarker {
    /// Line prefix, e.g. `##`.
    pub marker: String,

    /// Label used in a chunk's header path, e.g. `Header 2`.
    pub label: String,
}

impl HeaderMarker {
    pub fn new(marker: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            label: label.into(),
        }
    }
}

impl ChunkingConfig {
    /// Check the configuration before any splitting begins.
    pub fn validate(&self) -> Result<()> {
        if self.max_structural_chunk_size == 0 {
            return Err(ChunkError::invalid_configuration(
                "max_structural_chunk_size must be greater than zero",
            ));
        }
        validate_prose_window(
            self.max_prose_chunk_size,
            self.prose_overlap,
            &self.prose_separators,
        )?;
        validate_header_markers(&self.header_markers)
    }
}

/// Check the prose window bound, overlap and separators.
pub fn validate_prose_window(max_size: usize, overlap: usize, separators: &[String]) -> Result<()> {
    if max_size == 0 {
        return Err(ChunkError::invalid_configuration(
            "max_prose_chunk_size must be greater than zero",
        ));
    }
    if overlap >= max_size {
        return Err(ChunkError::invalid_configuration(format!(
            "prose_overlap ({}) must be smaller than max_prose_chunk_size ({})",
            overlap, max_size
        )));
    }
    if separators.iter().any(|s| s.is_empty()) {
        return Err(ChunkError::invalid_configuration(
            "prose_separators must not contain an empty separator",
        ));
    }
    Ok(())
}

/// Reject blank and duplicate heading markers.
pub fn validate_header_markers(markers: &[HeaderMarker]) -> Result<()> {
    let mut seen = HashSet::new();
    for marker in markers {
        if marker.marker.trim().is_empty() {
            return Err(ChunkError::invalid_configuration(
                "header markers must not be blank",
            ));
        }
        if !seen.insert(marker.marker.as_str()) {
            return Err(ChunkError::invalid_configuration(format!(
                "duplicate header marker: {}",
                marker.marker
            )));
        }
    }
    Ok(())
}

// Default value functions

fn default_max_structural_chunk_size() -> usize {
    500
}

fn default_max_prose_chunk_size() -> usize {
    1000
}

fn default_prose_overlap() -> usize {
    50
}

fn default_prose_separators() -> Vec<String> {
    vec![". ".to_string(), "\n".to_string(), "\n\n".to_string()]
}

fn default_header_markers() -> Vec<HeaderMarker> {
    vec![
        HeaderMarker::new("#", "Header 1"),
        HeaderMarker::new("##", "Header 2"),
        HeaderMarker::new("###", "Header 3"),
        HeaderMarker::new("####", "Header 4"),
    ]
}

impl RagTreeConfig {
    /// Load configuration from file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| ChunkError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;
        Ok(config)
    }

    /// Load configuration from default paths.
    ///
    /// The user config directory is tried before `./ragtree.toml`. Defaults
    /// apply when neither file exists.
    pub fn load_default() -> Result<Self> {
        let user_config = dirs::config_dir().map(|dir| dir.join("ragtree").join("config.toml"));
        let local_config = PathBuf::from("ragtree.toml");
        Self::load_first(user_config.into_iter().chain(std::iter::once(local_config)))
    }

    /// Load the first candidate file that exists.
    fn load_first(candidates: impl IntoIterator<Item = PathBuf>) -> Result<Self> {
        for path in candidates {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }
}
