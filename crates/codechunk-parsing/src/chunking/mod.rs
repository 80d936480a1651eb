//! Boundary-aware chunking over tree-sitter trees

pub mod boundary;
pub mod docs;
pub mod materializer;
pub mod names;
pub mod service;

pub use boundary::{BoundaryFilter, RawBoundary, accept_all, kinds_filter, traverse};
pub use docs::{DocFamily, Documentation};
pub use materializer::{BoundaryChunk, BoundaryInfo, ChunkMaterializer};
pub use names::extract_name;
pub use service::ChunkingService;

use tree_sitter::Node;

/// Source text covered by `node`
pub(crate) fn node_text<'s>(node: &Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}
