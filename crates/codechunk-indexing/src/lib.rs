//! Codechunk indexing crate
//!
//! Chunks files and directory trees from disk: walks directories with
//! ignore-file support, decodes file contents and runs the chunking service
//! for each file with bounded concurrency.

pub mod encoding;
pub mod error;
pub mod indexer;
pub mod scanner;

pub use encoding::{DecodedSource, decode_source};
pub use error::{FailureKind, IndexingError, IndexingResult};
pub use indexer::{ChunkIndexer, DirectoryReport, FileFailure, ScanOptions, service_from_config};
pub use scanner::FileScanner;
