//! Configuration source loading and composition

use crate::validation::Validate;
use crate::{ApplicationConfig, ConfigResult};
use std::path::{Path, PathBuf};

/// Trait for loading configuration from different sources
pub trait ConfigurationSource {
    /// Produce a configuration layered on top of `base`
    ///
    /// # Errors
    /// Returns configuration loading errors
    fn load(&self, base: ApplicationConfig) -> ConfigResult<ApplicationConfig>;

    /// Get the name of this configuration source
    fn name(&self) -> &str;

    /// Get the priority of this source (higher number = applied later)
    fn priority(&self) -> u8;
}

/// Overlay `CODECHUNK_*` environment variables
pub struct EnvironmentSource;

impl ConfigurationSource for EnvironmentSource {
    fn load(&self, base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
        Ok(base.with_env_overrides())
    }

    fn name(&self) -> &'static str {
        "environment"
    }

    fn priority(&self) -> u8 {
        100 // Highest priority - environment variables override everything
    }
}

/// Load configuration from a TOML file
///
/// Keys missing from the file keep their defaults.
pub struct TomlFileSource {
    path: PathBuf,
}

impl TomlFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigurationSource for TomlFileSource {
    fn load(&self, _base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
        let content = std::fs::read_to_string(&self.path)?;
        let config: ApplicationConfig = toml::from_str(&content)?;
        Ok(config)
    }

    fn name(&self) -> &'static str {
        "toml_file"
    }

    fn priority(&self) -> u8 {
        50 // Medium priority - below env vars, above defaults
    }
}

/// A source plus whether its failure aborts loading
struct RegisteredSource {
    source: Box<dyn ConfigurationSource>,
    required: bool,
}

/// Configuration loader that combines multiple sources
pub struct ConfigurationLoader {
    sources: Vec<RegisteredSource>,
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a source whose failure is logged and skipped
    #[must_use]
    pub fn add_source(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.sources.push(RegisteredSource {
            source,
            required: false,
        });
        self
    }

    /// Add a source whose failure fails [`Self::load`]
    #[must_use]
    pub fn add_required_source(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.sources.push(RegisteredSource {
            source,
            required: true,
        });
        self
    }

    /// Load configuration from all sources with priority ordering
    ///
    /// A failing optional source is logged and skipped; the merged result
    /// must still validate.
    ///
    /// # Errors
    /// Returns the error of a failing required source, or validation errors
    /// for the merged configuration
    pub fn load(&self) -> ConfigResult<ApplicationConfig> {
        let mut config = ApplicationConfig::default();

        // Lowest priority first, so later sources win
        let mut sorted_sources = self.sources.iter().collect::<Vec<_>>();
        sorted_sources.sort_by_key(|entry| entry.source.priority());

        for entry in sorted_sources {
            let source = &entry.source;
            match source.load(config.clone()) {
                Ok(layered) => {
                    tracing::debug!("Loaded configuration from source: {}", source.name());
                    config = layered;
                }
                Err(e) if entry.required => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to load from source {}: {}", source.name(), e);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use std::io::Write;

    struct FixedSource {
        concurrency: usize,
        priority: u8,
    }

    impl ConfigurationSource for FixedSource {
        fn load(&self, mut base: ApplicationConfig) -> ConfigResult<ApplicationConfig> {
            base.scan.concurrency = self.concurrency;
            Ok(base)
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn priority(&self) -> u8 {
            self.priority
        }
    }

    #[test]
    fn test_toml_file_source_reads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[chunking]\ndefault_language = \"python\"\n\n[scan]\nfollow_links = true"
        )
        .unwrap();

        let config = TomlFileSource::new(file.path())
            .load(ApplicationConfig::default())
            .unwrap();
        assert_eq!(config.chunking.default_language.as_deref(), Some("python"));
        assert!(config.scan.follow_links);
        assert_eq!(config.scan.concurrency, crate::DEFAULT_SCAN_CONCURRENCY);
    }

    #[test]
    fn test_higher_priority_source_wins() {
        let config = ConfigurationLoader::new()
            .add_source(Box::new(FixedSource {
                concurrency: 16,
                priority: 90,
            }))
            .add_source(Box::new(FixedSource {
                concurrency: 4,
                priority: 10,
            }))
            .load()
            .unwrap();
        assert_eq!(config.scan.concurrency, 16);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config = ConfigurationLoader::new()
            .add_source(Box::new(TomlFileSource::new("/nonexistent/codechunk.toml")))
            .load()
            .unwrap();
        assert_eq!(config, ApplicationConfig::default());
    }

    #[test]
    fn test_required_source_failure_is_returned() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scan]\nconcurrency = \"eight\"").unwrap();

        let lenient = ConfigurationLoader::new()
            .add_source(Box::new(TomlFileSource::new(file.path())))
            .load()
            .unwrap();
        assert_eq!(lenient, ApplicationConfig::default());

        let strict = ConfigurationLoader::new()
            .add_required_source(Box::new(TomlFileSource::new(file.path())))
            .load();
        assert!(matches!(strict, Err(ConfigError::TomlParsing(_))));
    }

    #[test]
    fn test_invalid_merged_config_is_rejected() {
        let result = ConfigurationLoader::new()
            .add_source(Box::new(FixedSource {
                concurrency: 0,
                priority: 1,
            }))
            .load();
        assert!(matches!(result, Err(ConfigError::OutOfRange { .. })));
    }
}
