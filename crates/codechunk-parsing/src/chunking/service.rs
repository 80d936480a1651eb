//! Chunking service
//!
//! Wires the grammar provider, boundary extractor and materializer together
//! for a single source string.

use crate::chunking::boundary::{BoundaryFilter, RawBoundary, accept_all, traverse};
use crate::chunking::materializer::{BoundaryChunk, ChunkMaterializer};
use crate::error::{ParsingError, ParsingResult};
use crate::parsing::grammar::GrammarProvider;
use crate::parsing::languages::{LanguageId, RegistryFallback, boundary_types};
use std::sync::Arc;

/// Turns source text into [`BoundaryChunk`]s
#[derive(Clone)]
pub struct ChunkingService {
    provider: Arc<GrammarProvider>,
    filter: BoundaryFilter,
    fallback: RegistryFallback,
}

impl ChunkingService {
    /// Service accepting every boundary, with strict language resolution
    pub fn new(provider: Arc<GrammarProvider>) -> Self {
        Self {
            provider,
            filter: accept_all(),
            fallback: RegistryFallback::Strict,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: BoundaryFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub const fn with_fallback(mut self, fallback: RegistryFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub const fn provider(&self) -> &Arc<GrammarProvider> {
        &self.provider
    }

    pub const fn fallback(&self) -> RegistryFallback {
        self.fallback
    }

    /// Chunk `source` as `language`
    ///
    /// # Errors
    /// - `NoParserForLanguage` when no grammar is available
    /// - `GrammarBinding` when the grammar failed to bind
    /// - `ParseFailed` when the parser produced no tree
    /// - `CacheError` when the parser lock is poisoned
    pub fn chunk_source(
        &self,
        source: &str,
        language: LanguageId,
    ) -> ParsingResult<Vec<BoundaryChunk>> {
        let boundaries = self.extract_boundaries(source, language)?;
        Ok(ChunkMaterializer::new(source, language).to_chunks(boundaries))
    }

    /// Like [`Self::chunk_source`], stamping every chunk with `file_path`
    ///
    /// # Errors
    /// Same as [`Self::chunk_source`]
    pub fn chunk_file_source(
        &self,
        source: &str,
        language: LanguageId,
        file_path: impl Into<String>,
    ) -> ParsingResult<Vec<BoundaryChunk>> {
        let boundaries = self.extract_boundaries(source, language)?;
        Ok(ChunkMaterializer::new(source, language)
            .with_file_path(file_path)
            .to_chunks(boundaries))
    }

    /// Chunk `source` as the language called `name`, honoring the fallback policy
    ///
    /// # Errors
    /// Returns `UnsupportedLanguage` for unknown names under a strict policy,
    /// plus every error of [`Self::chunk_source`]
    pub fn chunk_named(&self, source: &str, name: &str) -> ParsingResult<Vec<BoundaryChunk>> {
        let language = self.fallback.resolve(name)?;
        self.chunk_source(source, language)
    }

    /// Raw boundary records for `source`, before materialization
    ///
    /// # Errors
    /// Same as [`Self::chunk_source`]
    pub fn extract_boundaries(
        &self,
        source: &str,
        language: LanguageId,
    ) -> ParsingResult<Vec<RawBoundary>> {
        let parser = self
            .provider
            .create_parser(language)?
            .ok_or_else(|| ParsingError::NoParserForLanguage(language.to_string()))?;

        let mut guard = parser.lock().map_err(|_| {
            ParsingError::cache_error(format!("parser lock poisoned for {language}"))
        })?;
        let tree = guard
            .parse(source, None)
            .ok_or_else(|| ParsingError::ParseFailed(language.to_string()))?;
        drop(guard);

        let filter = &self.filter;
        let boundaries = traverse(
            tree.root_node(),
            source,
            language,
            boundary_types(language),
            |lang, node| filter(lang, node),
        );

        tracing::debug!(
            %language,
            bytes = source.len(),
            boundaries = boundaries.len(),
            "Extracted boundaries"
        );
        Ok(boundaries)
    }
}

impl std::fmt::Debug for ChunkingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkingService")
            .field("provider", &self.provider)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::grammar::GrammarLoader;
    use tree_sitter::{Language, Node};

    struct NothingLoads;

    impl GrammarLoader for NothingLoads {
        fn load(&self, language: LanguageId) -> ParsingResult<Language> {
            Err(ParsingError::grammar_unavailable(language.as_str(), "not installed"))
        }
    }

    fn service() -> ChunkingService {
        ChunkingService::new(Arc::new(GrammarProvider::new()))
    }

    #[test]
    fn test_greet_scenario() {
        let source = "function greet(name) { console.log(name); }\ngreet(\"World\");";
        let chunks = service().chunk_source(source, LanguageId::JavaScript).unwrap();

        assert_eq!(chunks.len(), 1);
        let chunk = &chunks[0];
        assert_eq!(chunk.boundary.kind, "function_declaration");
        assert_eq!(chunk.boundary.name.as_deref(), Some("greet"));
        assert_eq!(chunk.content, "function greet(name) { console.log(name); }");
        assert_eq!(chunk.start_offset, 0);
        assert!(chunk.boundary.parent.is_empty());
    }

    #[test]
    fn test_missing_grammar_is_no_parser_error() {
        let provider = GrammarProvider::with_loader(Arc::new(NothingLoads));
        let service = ChunkingService::new(Arc::new(provider));
        let result = service.chunk_source("fn main() {}", LanguageId::Rust);
        assert!(matches!(result, Err(ParsingError::NoParserForLanguage(lang)) if lang == "rust"));
    }

    #[test]
    fn test_chunk_named_strict_and_fallback() {
        let strict = service().chunk_named("fun main() {}", "kotlin");
        assert!(matches!(strict, Err(ParsingError::UnsupportedLanguage(_))));

        let lenient = service()
            .with_fallback(RegistryFallback::Default(LanguageId::JavaScript))
            .chunk_named("function main() {}", "kotlin")
            .unwrap();
        assert_eq!(lenient.len(), 1);
        assert_eq!(lenient[0].language, LanguageId::JavaScript);
    }

    #[test]
    fn test_filter_is_applied() {
        let source = "class A { run() {} }";
        let filtered = service()
            .with_filter(Arc::new(|_: LanguageId, node: &Node<'_>| {
                node.kind() == "method_definition"
            }))
            .chunk_source(source, LanguageId::JavaScript)
            .unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].boundary.name.as_deref(), Some("run"));
        assert!(filtered[0].boundary.parent.is_empty());
    }

    #[test]
    fn test_chunk_file_source_stamps_path() {
        let chunks = service()
            .chunk_file_source("def a():\n    pass\n", LanguageId::Python, "pkg/a.py")
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].file_path.as_deref(), Some("pkg/a.py"));
    }

    #[test]
    fn test_empty_source_yields_no_chunks() {
        let chunks = service().chunk_source("", LanguageId::Python).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_parser_is_reused_across_calls() {
        let service = service();
        service.chunk_source("fn a() {}", LanguageId::Rust).unwrap();
        service.chunk_source("fn b() {}", LanguageId::Rust).unwrap();
        assert_eq!(service.provider().load_count(), 1);
    }
}
