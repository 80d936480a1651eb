//! Grammar loading and parser lifecycle
//!
//! [`GrammarProvider`] owns one tree-sitter parser per language. Creation is
//! single-flight: the first caller for a language loads and binds the grammar
//! while concurrent callers for the same language wait on the same cell, so a
//! grammar is loaded at most once until [`GrammarProvider::dispose`] is called.

use crate::error::{ParsingError, ParsingResult};
use crate::parsing::languages::LanguageId;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tree_sitter::{Language, Parser};

/// Parser shared between callers of the same language
pub type SharedParser = Arc<Mutex<Parser>>;

/// Source of compiled grammars
pub trait GrammarLoader: Send + Sync {
    /// Load the compiled grammar for a language
    ///
    /// # Errors
    /// Returns `ParsingError::GrammarUnavailable` when the grammar cannot be loaded
    fn load(&self, language: LanguageId) -> ParsingResult<Language>;
}

/// Grammars linked into this build, one Cargo feature per language
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledGrammars;

impl GrammarLoader for BundledGrammars {
    #[allow(unreachable_patterns)]
    fn load(&self, language: LanguageId) -> ParsingResult<Language> {
        let grammar: Language = match language {
            #[cfg(feature = "lang-javascript")]
            LanguageId::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            #[cfg(feature = "lang-typescript")]
            LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            #[cfg(feature = "lang-typescript")]
            LanguageId::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            #[cfg(feature = "lang-python")]
            LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
            #[cfg(feature = "lang-go")]
            LanguageId::Go => tree_sitter_go::LANGUAGE.into(),
            #[cfg(feature = "lang-rust")]
            LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
            #[cfg(feature = "lang-java")]
            LanguageId::Java => tree_sitter_java::LANGUAGE.into(),
            #[cfg(feature = "lang-csharp")]
            LanguageId::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            #[cfg(feature = "lang-ruby")]
            LanguageId::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            #[cfg(feature = "lang-c")]
            LanguageId::C => tree_sitter_c::LANGUAGE.into(),
            #[cfg(feature = "lang-cpp")]
            LanguageId::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            #[cfg(feature = "lang-html")]
            LanguageId::Html => tree_sitter_html::LANGUAGE.into(),
            #[cfg(feature = "lang-css")]
            LanguageId::Css => tree_sitter_css::LANGUAGE.into(),
            #[cfg(feature = "lang-bash")]
            LanguageId::Bash => tree_sitter_bash::LANGUAGE.into(),
            _ => {
                return Err(ParsingError::grammar_unavailable(
                    language.as_str(),
                    "grammar not compiled into this build",
                ));
            }
        };
        Ok(grammar)
    }
}

/// Memoized outcome of creating a parser for one language
enum GrammarSlot {
    Ready(SharedParser),
    Unavailable(ParsingError),
    Broken(ParsingError),
}

type SlotCell = Arc<OnceCell<GrammarSlot>>;

/// Lazily creates and caches one parser per language
pub struct GrammarProvider {
    loader: Arc<dyn GrammarLoader>,
    slots: DashMap<LanguageId, SlotCell>,
    loads: AtomicUsize,
}

impl GrammarProvider {
    /// Provider backed by the grammars compiled into this build
    pub fn new() -> Self {
        Self::with_loader(Arc::new(BundledGrammars))
    }

    pub fn with_loader(loader: Arc<dyn GrammarLoader>) -> Self {
        Self {
            loader,
            slots: DashMap::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Parser for `language`, created on first use
    ///
    /// Returns `Ok(None)` when the grammar could not be loaded.
    ///
    /// # Errors
    /// Returns `ParsingError::GrammarBinding` when the grammar loaded but the
    /// parser rejected it
    pub fn create_parser(&self, language: LanguageId) -> ParsingResult<Option<SharedParser>> {
        let cell = self.slot(language);
        match cell.get_or_init(|| self.load_slot(language)) {
            GrammarSlot::Ready(parser) => Ok(Some(Arc::clone(parser))),
            GrammarSlot::Unavailable(_) => Ok(None),
            GrammarSlot::Broken(err) => Err(err.clone()),
        }
    }

    /// Like [`Self::create_parser`], keyed by a language name
    ///
    /// Unknown names yield `Ok(None)` without touching the loader.
    ///
    /// # Errors
    /// Returns `ParsingError::GrammarBinding` for a grammar that failed to bind
    pub fn create_parser_named(&self, name: &str) -> ParsingResult<Option<SharedParser>> {
        match name.parse::<LanguageId>() {
            Ok(language) => self.create_parser(language),
            Err(_) => {
                tracing::debug!(language = name, "No grammar for unknown language");
                Ok(None)
            }
        }
    }

    /// Why `language` has no parser, if a load was attempted and failed
    pub fn failure(&self, language: LanguageId) -> Option<ParsingError> {
        let cell = self.slots.get(&language).map(|entry| Arc::clone(entry.value()))?;
        match cell.get()? {
            GrammarSlot::Ready(_) => None,
            GrammarSlot::Unavailable(err) | GrammarSlot::Broken(err) => Some(err.clone()),
        }
    }

    /// Release every cached parser; later requests recreate them
    pub fn dispose(&self) {
        let released = self.slots.len();
        self.slots.clear();
        tracing::debug!(released, "Grammar provider disposed");
    }

    /// Number of grammar loads performed so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Languages with a memoized outcome
    pub fn cached_languages(&self) -> Vec<LanguageId> {
        let mut languages: Vec<_> = self.slots.iter().map(|entry| *entry.key()).collect();
        languages.sort_unstable();
        languages
    }

    fn slot(&self, language: LanguageId) -> SlotCell {
        // Clone the cell out so the shard lock is released before the load runs
        Arc::clone(
            self.slots
                .entry(language)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        )
    }

    fn load_slot(&self, language: LanguageId) -> GrammarSlot {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(%language, "Loading grammar");

        let grammar = match self.loader.load(language) {
            Ok(grammar) => grammar,
            Err(err) => {
                tracing::warn!(%language, error = %err, "Grammar unavailable");
                return GrammarSlot::Unavailable(err);
            }
        };

        let mut parser = Parser::new();
        match parser.set_language(&grammar) {
            Ok(()) => GrammarSlot::Ready(Arc::new(Mutex::new(parser))),
            Err(err) => {
                let err = ParsingError::grammar_binding(language.as_str(), err.to_string());
                tracing::error!(%language, error = %err, "Grammar failed to bind");
                GrammarSlot::Broken(err)
            }
        }
    }
}

impl Default for GrammarProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GrammarProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarProvider")
            .field("cached", &self.cached_languages())
            .field("loads", &self.load_count())
            .finish_non_exhaustive()
    }
}
