//! Error types for the parsing crate
//!
//! Defines the failure kinds of grammar loading, parser binding and boundary chunking.

use thiserror::Error;

/// Parsing-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    /// Extension or language id has no registry entry
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    /// Grammar module could not be loaded (e.g. compiled out of this build)
    #[error("Grammar unavailable for {language}: {reason}")]
    GrammarUnavailable { language: String, reason: String },

    /// Grammar loaded but was rejected by the parser (incompatible build)
    #[error("Grammar for {language} failed to bind to a parser: {reason}")]
    GrammarBinding { language: String, reason: String },

    /// Chunking was requested for a language with no usable parser
    #[error("No parser available for language: {0}")]
    NoParserForLanguage(String),

    /// The parser returned no tree
    #[error("Parse failed for language: {0}")]
    ParseFailed(String),

    /// Cache error (poisoned parser lock, etc.)
    #[error("Cache error: {0}")]
    CacheError(String),
}

impl ParsingError {
    /// Create an unsupported language error
    pub fn unsupported_language(language: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(language.into())
    }

    /// Create a grammar unavailable error
    pub fn grammar_unavailable(language: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GrammarUnavailable {
            language: language.into(),
            reason: reason.into(),
        }
    }

    /// Create a grammar binding error
    pub fn grammar_binding(language: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GrammarBinding {
            language: language.into(),
            reason: reason.into(),
        }
    }

    /// Create a cache error
    pub fn cache_error(msg: impl Into<String>) -> Self {
        Self::CacheError(msg.into())
    }

    /// Short machine-friendly label, used when failures are reported per file
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage(_) => "unsupported",
            Self::GrammarUnavailable { .. } => "grammar_unavailable",
            Self::GrammarBinding { .. } => "grammar_binding",
            Self::NoParserForLanguage(_) => "no_parser",
            Self::ParseFailed(_) => "parse_failed",
            Self::CacheError(_) => "internal",
        }
    }
}

/// Result type alias for parsing operations
pub type ParsingResult<T> = Result<T, ParsingError>;
