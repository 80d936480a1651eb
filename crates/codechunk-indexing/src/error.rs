//! Error types for file and directory chunking

use codechunk_config::ConfigError;
use codechunk_parsing::ParsingError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while chunking files from disk
#[derive(Error, Debug)]
pub enum IndexingError {
    #[error("IO error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Binary or undecodable file: {path}")]
    BinaryFile { path: String },

    #[error("File {path} is {size} bytes, over the {limit} byte limit")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error(transparent)]
    Parsing(#[from] ParsingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Chunking task failed: {0}")]
    TaskFailed(String),
}

impl IndexingError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Category used when this error is reported for a single file
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Io { .. } | Self::NotADirectory { .. } => FailureKind::Io,
            Self::BinaryFile { .. } => FailureKind::Binary,
            Self::FileTooLarge { .. } => FailureKind::TooLarge,
            Self::Parsing(err) => match err {
                ParsingError::UnsupportedLanguage(_) => FailureKind::Unsupported,
                ParsingError::GrammarUnavailable { .. } => FailureKind::GrammarUnavailable,
                ParsingError::GrammarBinding { .. } => FailureKind::GrammarBinding,
                ParsingError::NoParserForLanguage(_) => FailureKind::NoParser,
                ParsingError::ParseFailed(_) => FailureKind::ParseFailed,
                ParsingError::CacheError(_) => FailureKind::Internal,
            },
            Self::Config(_) | Self::TaskFailed(_) => FailureKind::Internal,
        }
    }
}

/// Why a file produced no chunks during a directory scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Unsupported,
    Binary,
    TooLarge,
    Io,
    NoParser,
    GrammarUnavailable,
    GrammarBinding,
    ParseFailed,
    Internal,
}

/// Result type alias for indexing operations
pub type IndexingResult<T> = Result<T, IndexingError>;
