//! Configuration for codechunk
//!
//! Settings come from three layers, lowest priority first: built-in defaults,
//! an optional TOML file, and `CODECHUNK_*` environment variables. Every
//! section has safe defaults so an empty environment yields a usable config.

pub mod error;
pub mod source;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use source::{ConfigurationLoader, ConfigurationSource, EnvironmentSource, TomlFileSource};
pub use validation::Validate;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

// Chunking defaults
pub const DEFAULT_CHUNKING_KINDS: &[&str] = &[];

// Scan defaults
pub const DEFAULT_SCAN_CONCURRENCY: usize = 8;
pub const DEFAULT_SCAN_RESPECT_GITIGNORE: bool = true;
pub const DEFAULT_SCAN_INCLUDE_HIDDEN: bool = false;
pub const DEFAULT_SCAN_FOLLOW_LINKS: bool = false;
pub const DEFAULT_SCAN_MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = false;

pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Variable lookup, `std::env::var` in production
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse `key` when present; unparseable values are logged and ignored
fn parsed<T: FromStr>(lookup: Lookup<'_>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    raw.trim().parse().ok().or_else(|| {
        tracing::warn!(key, value = %raw, "Ignoring unparseable configuration value");
        None
    })
}

/// Boundary chunking configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Language used for unmapped extensions and unknown names; `None` keeps
    /// resolution strict
    pub default_language: Option<String>,

    /// Only emit these node kinds; empty means every boundary kind
    pub kinds: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            default_language: None,
            kinds: DEFAULT_CHUNKING_KINDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ChunkingConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(&env_lookup);
        config
    }

    fn apply_overrides(&mut self, lookup: Lookup<'_>) {
        if let Some(language) = lookup("CODECHUNK_CHUNKING_DEFAULT_LANGUAGE") {
            let language = language.trim();
            self.default_language = (!language.is_empty()).then(|| language.to_string());
        }
        if let Some(kinds) = lookup("CODECHUNK_CHUNKING_KINDS") {
            self.kinds = kinds
                .split(',')
                .map(str::trim)
                .filter(|kind| !kind.is_empty())
                .map(ToString::to_string)
                .collect();
        }
    }
}

impl Validate for ChunkingConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(language) = &self.default_language {
            validation::validate_non_empty(language, "chunking.default_language")?;
        }
        for kind in &self.kinds {
            validation::validate_non_empty(kind, "chunking.kinds")?;
        }
        Ok(())
    }
}

/// Directory scan configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Files chunked concurrently
    pub concurrency: usize,

    /// Skip paths matched by .gitignore / .ignore files
    pub respect_gitignore: bool,

    /// Descend into dot-files and dot-directories
    pub include_hidden: bool,

    /// Follow symbolic links while walking
    pub follow_links: bool,

    /// Files larger than this are reported and skipped
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_SCAN_CONCURRENCY,
            respect_gitignore: DEFAULT_SCAN_RESPECT_GITIGNORE,
            include_hidden: DEFAULT_SCAN_INCLUDE_HIDDEN,
            follow_links: DEFAULT_SCAN_FOLLOW_LINKS,
            max_file_bytes: DEFAULT_SCAN_MAX_FILE_BYTES,
        }
    }
}

impl ScanConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(&env_lookup);
        config
    }

    fn apply_overrides(&mut self, lookup: Lookup<'_>) {
        if let Some(concurrency) = parsed(lookup, "CODECHUNK_SCAN_CONCURRENCY") {
            self.concurrency = concurrency;
        }
        if let Some(respect) = parsed(lookup, "CODECHUNK_SCAN_RESPECT_GITIGNORE") {
            self.respect_gitignore = respect;
        }
        if let Some(hidden) = parsed(lookup, "CODECHUNK_SCAN_INCLUDE_HIDDEN") {
            self.include_hidden = hidden;
        }
        if let Some(follow) = parsed(lookup, "CODECHUNK_SCAN_FOLLOW_LINKS") {
            self.follow_links = follow;
        }
        if let Some(max_bytes) = parsed(lookup, "CODECHUNK_SCAN_MAX_FILE_BYTES") {
            self.max_file_bytes = max_bytes;
        }
    }
}

impl Validate for ScanConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_range(self.concurrency as u64, 1, 256, "scan.concurrency")?;
        validation::validate_range(
            self.max_file_bytes,
            1,
            1024 * 1024 * 1024,
            "scan.max_file_bytes",
        )?;
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: DEFAULT_LOG_JSON,
        }
    }
}

impl LoggingConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(&env_lookup);
        config
    }

    fn apply_overrides(&mut self, lookup: Lookup<'_>) {
        if let Some(level) = lookup("CODECHUNK_LOG_LEVEL") {
            self.level = level.trim().to_lowercase();
        }
        if let Some(json) = parsed(lookup, "CODECHUNK_LOG_JSON") {
            self.json = json;
        }
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(&self.level, "logging.level")?;
        validation::validate_choice(&self.level, LOG_LEVELS, "logging.level")
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub chunking: ChunkingConfig,
    pub scan: ScanConfig,
    pub logging: LoggingConfig,
}

impl ApplicationConfig {
    /// Defaults overlaid with `CODECHUNK_*` environment variables
    pub fn from_env() -> Self {
        Self {
            chunking: ChunkingConfig::from_env(),
            scan: ScanConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }

    /// Overlay environment variables on an existing configuration
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(&env_lookup)
    }

    /// Overlay values from `lookup` (keys are `CODECHUNK_*` variable names)
    #[must_use]
    pub fn with_overrides(mut self, lookup: Lookup<'_>) -> Self {
        self.chunking.apply_overrides(lookup);
        self.scan.apply_overrides(lookup);
        self.logging.apply_overrides(lookup);
        self
    }
}

impl Validate for ApplicationConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.chunking.validate()?;
        self.scan.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Per-user config file location (`~/.config/codechunk/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("codechunk").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_uses_safe_defaults() {
        let config = ApplicationConfig::default();

        assert_eq!(config.scan.concurrency, DEFAULT_SCAN_CONCURRENCY);
        assert_eq!(config.scan.max_file_bytes, DEFAULT_SCAN_MAX_FILE_BYTES);
        assert!(config.scan.respect_gitignore);
        assert_eq!(config.chunking.default_language, None);
        assert!(config.chunking.kinds.is_empty());
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_variable_overrides() {
        let lookup = lookup_from(&[
            ("CODECHUNK_SCAN_CONCURRENCY", "3"),
            ("CODECHUNK_SCAN_INCLUDE_HIDDEN", "true"),
            ("CODECHUNK_CHUNKING_DEFAULT_LANGUAGE", "javascript"),
            ("CODECHUNK_CHUNKING_KINDS", "function_item, struct_item,"),
            ("CODECHUNK_LOG_LEVEL", "DEBUG"),
        ]);
        let config = ApplicationConfig::default().with_overrides(&lookup);

        assert_eq!(config.scan.concurrency, 3);
        assert!(config.scan.include_hidden);
        assert_eq!(config.chunking.default_language.as_deref(), Some("javascript"));
        assert_eq!(config.chunking.kinds, vec!["function_item", "struct_item"]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unparseable_values_keep_previous_setting() {
        let lookup = lookup_from(&[("CODECHUNK_SCAN_CONCURRENCY", "lots")]);
        let config = ApplicationConfig::default().with_overrides(&lookup);
        assert_eq!(config.scan.concurrency, DEFAULT_SCAN_CONCURRENCY);
    }

    #[test]
    fn test_empty_default_language_disables_fallback() {
        let lookup = lookup_from(&[("CODECHUNK_CHUNKING_DEFAULT_LANGUAGE", "  ")]);
        let mut config = ApplicationConfig::default();
        config.chunking.default_language = Some("python".to_string());
        let config = config.with_overrides(&lookup);
        assert_eq!(config.chunking.default_language, None);
    }

    #[test]
    fn test_validation_rejects_out_of_range_concurrency() {
        let mut config = ApplicationConfig::default();
        config.scan.concurrency = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scan.concurrency"));
    }

    #[test]
    fn test_validation_rejects_unknown_log_level() {
        let mut config = ApplicationConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn test_config_can_be_serialized_to_toml() {
        let config = ApplicationConfig::default();
        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("[scan]"));
        assert!(toml_string.contains("[logging]"));

        let parsed: ApplicationConfig = toml::from_str(&toml_string).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: ApplicationConfig = toml::from_str("[scan]\nconcurrency = 2\n").unwrap();
        assert_eq!(parsed.scan.concurrency, 2);
        assert_eq!(parsed.scan.max_file_bytes, DEFAULT_SCAN_MAX_FILE_BYTES);
        assert_eq!(parsed.logging, LoggingConfig::default());
    }
}
