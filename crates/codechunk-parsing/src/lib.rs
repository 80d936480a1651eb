//! Codechunk parsing and chunking crate
//!
//! This crate extracts declaration-sized chunks (functions, classes, methods,
//! types, imports) from source code using tree-sitter. It owns the language
//! registry, the grammar/parser lifecycle and the boundary traversal with its
//! name and documentation heuristics.

pub mod chunking;
pub mod error;
pub mod parsing;

// Re-export main types
pub use chunking::{
    BoundaryChunk, BoundaryFilter, BoundaryInfo, ChunkMaterializer, ChunkingService, RawBoundary,
    accept_all, kinds_filter, traverse,
};
pub use error::{ParsingError, ParsingResult};
pub use parsing::{
    GrammarLoader, GrammarProvider, LanguageId, RegistryFallback, boundary_types,
    get_language_from_extension,
};
