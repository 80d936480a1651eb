//! Command-line arguments

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use codechunk_config::{
    ApplicationConfig, ConfigurationLoader, EnvironmentSource, TomlFileSource, Validate,
    default_config_path,
};
use std::path::PathBuf;

/// codechunk - split source code into declaration-sized chunks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (TOML format)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chunk a file or every file under a directory and print JSON
    Chunk(ChunkArgs),
    /// List supported languages with their extensions and boundary kinds
    Languages,
}

#[derive(Args, Debug, Clone)]
pub struct ChunkArgs {
    /// File or directory to chunk
    pub path: PathBuf,

    /// Language used for files whose extension is not recognized
    #[arg(long, short = 'l')]
    pub language: Option<String>,

    /// Only emit these node kinds (comma separated)
    #[arg(long, short = 'k', value_delimiter = ',')]
    pub kinds: Vec<String>,

    /// Files chunked concurrently during a directory scan
    #[arg(long, short = 'j')]
    pub concurrency: Option<usize>,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Do not honor .gitignore and .ignore files
    #[arg(long)]
    pub no_ignore: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Defaults, then the TOML file, then `CODECHUNK_*` variables
    ///
    /// An explicit `--config` must exist and parse; the per-user default
    /// file is only read when present, and skipped if it is broken.
    ///
    /// # Errors
    /// Returns an error for a missing or malformed explicit config file, or
    /// an invalid result
    pub fn load_config(&self) -> anyhow::Result<ApplicationConfig> {
        let loader = ConfigurationLoader::new().add_source(Box::new(EnvironmentSource));
        let loader = match &self.config {
            Some(path) if !path.is_file() => {
                bail!("Config file '{}' does not exist", path.display())
            }
            Some(path) => loader.add_required_source(Box::new(TomlFileSource::new(path))),
            None => match default_config_path().filter(|path| path.is_file()) {
                Some(path) => loader.add_source(Box::new(TomlFileSource::new(path))),
                None => loader,
            },
        };

        loader.load().context("Invalid configuration")
    }
}

impl ChunkArgs {
    /// Command-line flags override every other configuration source
    ///
    /// # Errors
    /// Returns an error when the overridden configuration fails validation
    pub fn apply(&self, mut config: ApplicationConfig) -> anyhow::Result<ApplicationConfig> {
        if let Some(language) = &self.language {
            config.chunking.default_language = Some(language.clone());
        }
        if !self.kinds.is_empty() {
            config.chunking.kinds = self
                .kinds
                .iter()
                .map(|kind| kind.trim().to_string())
                .filter(|kind| !kind.is_empty())
                .collect();
        }
        if let Some(concurrency) = self.concurrency {
            config.scan.concurrency = concurrency;
        }
        if self.hidden {
            config.scan.include_hidden = true;
        }
        if self.no_ignore {
            config.scan.respect_gitignore = false;
        }

        config.validate().context("Invalid command-line option")?;
        Ok(config)
    }
}
