//! Language tables and grammar lifecycle

pub mod grammar;
pub mod languages;

pub use grammar::{BundledGrammars, GrammarLoader, GrammarProvider, SharedParser};
pub use languages::{
    BoundaryTypeSet, LanguageConfig, LanguageId, RegistryFallback, boundary_types,
    boundary_types_for, get_language_config, get_language_from_extension,
};
