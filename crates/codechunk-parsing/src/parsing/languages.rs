//! Language registry for boundary chunking
//!
//! This module centralizes every per-language table the chunker needs: the
//! closed set of language ids, the file extensions mapped to them, and the
//! CST node kinds treated as chunk boundaries.

use crate::error::{ParsingError, ParsingResult};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Closed set of languages the chunker understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Go,
    Rust,
    Java,
    CSharp,
    Ruby,
    C,
    Cpp,
    Html,
    Css,
    Bash,
}

impl LanguageId {
    /// Every supported language, in registry order
    pub const ALL: [Self; 14] = [
        Self::JavaScript,
        Self::TypeScript,
        Self::Tsx,
        Self::Python,
        Self::Go,
        Self::Rust,
        Self::Java,
        Self::CSharp,
        Self::Ruby,
        Self::C,
        Self::Cpp,
        Self::Html,
        Self::Css,
        Self::Bash,
    ];

    /// Canonical lowercase identifier
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Python => "python",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Ruby => "ruby",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Html => "html",
            Self::Css => "css",
            Self::Bash => "bash",
        }
    }

    /// Resolve a language from a file extension (with or without the leading dot)
    pub fn from_extension(extension: &str) -> Option<Self> {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        EXTENSION_MAP.get(normalized.as_str()).copied()
    }

    /// Resolve a language from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" | "jsx" => Ok(Self::JavaScript),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            "python" | "py" => Ok(Self::Python),
            "go" | "golang" => Ok(Self::Go),
            "rust" | "rs" => Ok(Self::Rust),
            "java" => Ok(Self::Java),
            "csharp" | "c#" | "cs" => Ok(Self::CSharp),
            "ruby" | "rb" => Ok(Self::Ruby),
            "c" => Ok(Self::C),
            "cpp" | "c++" => Ok(Self::Cpp),
            "html" => Ok(Self::Html),
            "css" => Ok(Self::Css),
            "bash" | "sh" | "shell" => Ok(Self::Bash),
            _ => Err(ParsingError::unsupported_language(s)),
        }
    }
}

/// Flattened set of node kinds that mark a boundary for one language
pub type BoundaryTypeSet = HashSet<&'static str>;

/// Configuration for a specific programming language
///
/// Boundary kinds are grouped by category for readability only; membership
/// tests go through the flattened [`BoundaryTypeSet`].
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    pub id: LanguageId,
    /// File extensions associated with this language
    pub extensions: &'static [&'static str],
    pub functions: &'static [&'static str],
    pub classes: &'static [&'static str],
    pub methods: &'static [&'static str],
    pub interfaces: &'static [&'static str],
    pub types: &'static [&'static str],
    pub imports: &'static [&'static str],
    pub variables: &'static [&'static str],
}

impl LanguageConfig {
    /// Creates an empty language configuration
    pub const fn new(id: LanguageId) -> Self {
        Self {
            id,
            extensions: &[],
            functions: &[],
            classes: &[],
            methods: &[],
            interfaces: &[],
            types: &[],
            imports: &[],
            variables: &[],
        }
    }

    pub const fn with_extensions(mut self, extensions: &'static [&'static str]) -> Self {
        self.extensions = extensions;
        self
    }

    pub const fn with_functions(mut self, kinds: &'static [&'static str]) -> Self {
        self.functions = kinds;
        self
    }

    pub const fn with_classes(mut self, kinds: &'static [&'static str]) -> Self {
        self.classes = kinds;
        self
    }

    pub const fn with_methods(mut self, kinds: &'static [&'static str]) -> Self {
        self.methods = kinds;
        self
    }

    pub const fn with_interfaces(mut self, kinds: &'static [&'static str]) -> Self {
        self.interfaces = kinds;
        self
    }

    pub const fn with_types(mut self, kinds: &'static [&'static str]) -> Self {
        self.types = kinds;
        self
    }

    pub const fn with_imports(mut self, kinds: &'static [&'static str]) -> Self {
        self.imports = kinds;
        self
    }

    pub const fn with_variables(mut self, kinds: &'static [&'static str]) -> Self {
        self.variables = kinds;
        self
    }

    /// Union of all boundary categories
    pub fn flatten(&self) -> BoundaryTypeSet {
        [
            self.functions,
            self.classes,
            self.methods,
            self.interfaces,
            self.types,
            self.imports,
            self.variables,
        ]
        .into_iter()
        .flatten()
        .copied()
        .collect()
    }
}

const JS_FUNCTIONS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "arrow_function",
    "function_expression",
    "generator_function",
];
const JS_CLASSES: &[&str] = &["class_declaration", "class"];
const JS_IMPORTS: &[&str] = &["import_statement"];
const JS_VARIABLES: &[&str] = &["lexical_declaration", "variable_declaration"];

const TS_FUNCTIONS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "arrow_function",
    "function_expression",
    "generator_function",
    "function_signature",
];
const TS_CLASSES: &[&str] = &["class_declaration", "class", "abstract_class_declaration"];
const TS_METHODS: &[&str] = &[
    "method_definition",
    "method_signature",
    "abstract_method_signature",
];
const TS_TYPES: &[&str] = &[
    "type_alias_declaration",
    "enum_declaration",
    "internal_module",
    "module",
];

const C_FUNCTIONS: &[&str] = &["function_definition"];
const C_CLASSES: &[&str] = &["struct_specifier", "union_specifier", "enum_specifier"];
const CPP_CLASSES: &[&str] = &[
    "struct_specifier",
    "union_specifier",
    "enum_specifier",
    "class_specifier",
];

lazy_static! {
    /// Registry of all supported language configurations
    pub static ref LANGUAGE_REGISTRY: HashMap<LanguageId, LanguageConfig> = {
        let mut registry = HashMap::new();

        registry.insert(
            LanguageId::JavaScript,
            LanguageConfig::new(LanguageId::JavaScript)
                .with_extensions(&["js", "mjs", "cjs", "jsx"])
                .with_functions(JS_FUNCTIONS)
                .with_classes(JS_CLASSES)
                .with_methods(&["method_definition"])
                .with_imports(JS_IMPORTS)
                .with_variables(JS_VARIABLES),
        );

        registry.insert(
            LanguageId::TypeScript,
            LanguageConfig::new(LanguageId::TypeScript)
                .with_extensions(&["ts", "mts", "cts"])
                .with_functions(TS_FUNCTIONS)
                .with_classes(TS_CLASSES)
                .with_methods(TS_METHODS)
                .with_interfaces(&["interface_declaration"])
                .with_types(TS_TYPES)
                .with_imports(JS_IMPORTS)
                .with_variables(JS_VARIABLES),
        );

        // Same node kinds as TypeScript, separate grammar
        registry.insert(
            LanguageId::Tsx,
            LanguageConfig::new(LanguageId::Tsx)
                .with_extensions(&["tsx"])
                .with_functions(TS_FUNCTIONS)
                .with_classes(TS_CLASSES)
                .with_methods(TS_METHODS)
                .with_interfaces(&["interface_declaration"])
                .with_types(TS_TYPES)
                .with_imports(JS_IMPORTS)
                .with_variables(JS_VARIABLES),
        );

        registry.insert(
            LanguageId::Python,
            LanguageConfig::new(LanguageId::Python)
                .with_extensions(&["py", "pyi", "pyw"])
                .with_functions(&["function_definition"])
                .with_classes(&["class_definition"])
                .with_imports(&["import_statement", "import_from_statement"]),
        );

        registry.insert(
            LanguageId::Go,
            LanguageConfig::new(LanguageId::Go)
                .with_extensions(&["go"])
                .with_functions(&["function_declaration"])
                .with_methods(&["method_declaration"])
                .with_types(&["type_declaration"])
                .with_imports(&["import_declaration"])
                .with_variables(&["const_declaration", "var_declaration"]),
        );

        registry.insert(
            LanguageId::Rust,
            LanguageConfig::new(LanguageId::Rust)
                .with_extensions(&["rs"])
                .with_functions(&["function_item", "function_signature_item"])
                .with_classes(&["struct_item", "enum_item", "union_item", "impl_item"])
                .with_interfaces(&["trait_item"])
                .with_types(&["type_item", "mod_item", "macro_definition"])
                .with_imports(&["use_declaration"])
                .with_variables(&["const_item", "static_item"]),
        );

        registry.insert(
            LanguageId::Java,
            LanguageConfig::new(LanguageId::Java)
                .with_extensions(&["java"])
                .with_classes(&["class_declaration", "enum_declaration", "record_declaration"])
                .with_methods(&["method_declaration", "constructor_declaration"])
                .with_interfaces(&["interface_declaration", "annotation_type_declaration"])
                .with_imports(&["import_declaration"])
                .with_variables(&["field_declaration"]),
        );

        registry.insert(
            LanguageId::CSharp,
            LanguageConfig::new(LanguageId::CSharp)
                .with_extensions(&["cs", "csx"])
                .with_classes(&[
                    "class_declaration",
                    "struct_declaration",
                    "record_declaration",
                    "enum_declaration",
                ])
                .with_methods(&[
                    "method_declaration",
                    "constructor_declaration",
                    "property_declaration",
                ])
                .with_interfaces(&["interface_declaration"])
                .with_types(&["namespace_declaration", "file_scoped_namespace_declaration"])
                .with_imports(&["using_directive"]),
        );

        registry.insert(
            LanguageId::Ruby,
            LanguageConfig::new(LanguageId::Ruby)
                .with_extensions(&["rb", "rake", "gemspec"])
                .with_classes(&["class", "module"])
                .with_methods(&["method", "singleton_method"]),
        );

        registry.insert(
            LanguageId::C,
            LanguageConfig::new(LanguageId::C)
                .with_extensions(&["c", "h"])
                .with_functions(C_FUNCTIONS)
                .with_classes(C_CLASSES)
                .with_types(&["type_definition"])
                .with_imports(&["preproc_include"]),
        );

        registry.insert(
            LanguageId::Cpp,
            LanguageConfig::new(LanguageId::Cpp)
                .with_extensions(&["cpp", "cxx", "cc", "c++", "hpp", "hxx", "hh", "h++"])
                .with_functions(C_FUNCTIONS)
                .with_classes(CPP_CLASSES)
                .with_types(&["type_definition", "namespace_definition"])
                .with_imports(&["preproc_include"]),
        );

        registry.insert(
            LanguageId::Html,
            LanguageConfig::new(LanguageId::Html)
                .with_extensions(&["html", "htm", "xhtml"])
                .with_classes(&["element", "script_element", "style_element"]),
        );

        registry.insert(
            LanguageId::Css,
            LanguageConfig::new(LanguageId::Css)
                .with_extensions(&["css"])
                .with_classes(&["rule_set"])
                .with_types(&["media_statement", "keyframes_statement"])
                .with_imports(&["import_statement"]),
        );

        registry.insert(
            LanguageId::Bash,
            LanguageConfig::new(LanguageId::Bash)
                .with_extensions(&["sh", "bash", "zsh", "ksh"])
                .with_functions(&["function_definition"]),
        );

        registry
    };

    /// Flattened boundary sets, built once per language
    static ref BOUNDARY_TYPES: HashMap<LanguageId, BoundaryTypeSet> = LANGUAGE_REGISTRY
        .iter()
        .map(|(id, config)| (*id, config.flatten()))
        .collect();

    /// Map of file extensions to language ids
    pub static ref EXTENSION_MAP: HashMap<&'static str, LanguageId> = {
        let mut map = HashMap::new();

        for (lang_id, config) in LANGUAGE_REGISTRY.iter() {
            for ext in config.extensions {
                map.insert(*ext, *lang_id);
            }
        }

        map
    };

    static ref EMPTY_BOUNDARIES: BoundaryTypeSet = HashSet::new();
}

/// Gets a language configuration by id
pub fn get_language_config(language: LanguageId) -> Option<&'static LanguageConfig> {
    LANGUAGE_REGISTRY.get(&language)
}

/// Gets a language id from a file extension
pub fn get_language_from_extension(extension: &str) -> Option<LanguageId> {
    LanguageId::from_extension(extension)
}

/// Boundary node kinds for a language
pub fn boundary_types(language: LanguageId) -> &'static BoundaryTypeSet {
    BOUNDARY_TYPES.get(&language).unwrap_or(&EMPTY_BOUNDARIES)
}

/// What to do when a language name is not in the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistryFallback {
    /// Unknown names are an [`ParsingError::UnsupportedLanguage`] error
    #[default]
    Strict,
    /// Unknown names are treated as this language
    Default(LanguageId),
}

impl RegistryFallback {
    /// Resolve a language name under this policy
    ///
    /// # Errors
    /// Returns `ParsingError::UnsupportedLanguage` for unknown names under `Strict`
    pub fn resolve(self, name: &str) -> ParsingResult<LanguageId> {
        match (name.parse::<LanguageId>(), self) {
            (Ok(language), _) => Ok(language),
            (Err(err), Self::Strict) => Err(err),
            (Err(_), Self::Default(language)) => {
                tracing::warn!(
                    requested = name,
                    fallback = %language,
                    "Unknown language, falling back to default boundary table"
                );
                Ok(language)
            }
        }
    }
}

/// Boundary node kinds for a language name, honoring the fallback policy
///
/// # Errors
/// Returns `ParsingError::UnsupportedLanguage` when the name is unknown and
/// the policy is `Strict`
pub fn boundary_types_for(
    name: &str,
    fallback: RegistryFallback,
) -> ParsingResult<(LanguageId, &'static BoundaryTypeSet)> {
    let language = fallback.resolve(name)?;
    Ok((language, boundary_types(language)))
}
