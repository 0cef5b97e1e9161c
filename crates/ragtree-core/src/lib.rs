//! ragtree-core - Core types and traits for ragtree
//!
//! This crate provides the document tree model, chunk types, configuration,
//! error handling and collaborator traits used by the chunking pipeline.

pub mod config;
pub mod error;
pub mod node;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::{ChunkError, Result};
pub use node::Node;
pub use traits::*;
pub use types::*;
