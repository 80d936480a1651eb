//! File and directory chunking on top of [`ChunkingService`]
//!
//! Files are read and decoded asynchronously, parsed on the blocking pool and
//! reported in walk order. One bad file never aborts a directory scan; it is
//! recorded as a [`FileFailure`] and the scan moves on.

use crate::encoding::decode_source;
use crate::error::{FailureKind, IndexingError, IndexingResult};
use crate::scanner::FileScanner;
use codechunk_config::{ChunkingConfig, ScanConfig};
use codechunk_parsing::{
    BoundaryChunk, ChunkingService, GrammarProvider, LanguageId, ParsingError, RegistryFallback,
    kinds_filter,
};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// How a directory is walked and how many files are in flight at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub concurrency: usize,
    pub respect_gitignore: bool,
    pub include_hidden: bool,
    pub follow_links: bool,
    pub max_file_bytes: u64,
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            respect_gitignore: config.respect_gitignore,
            include_hidden: config.include_hidden,
            follow_links: config.follow_links,
            max_file_bytes: config.max_file_bytes,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

/// A file that produced no chunks during a directory scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of chunking every file under a directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectoryReport {
    pub files_scanned: usize,
    pub files_chunked: usize,
    pub chunks: Vec<BoundaryChunk>,
    pub failures: Vec<FileFailure>,
}

/// Build a [`ChunkingService`] from the `[chunking]` configuration section
///
/// # Errors
/// Returns `UnsupportedLanguage` when `default_language` names no known language
pub fn service_from_config(
    config: &ChunkingConfig,
    provider: Arc<GrammarProvider>,
) -> IndexingResult<ChunkingService> {
    let mut service = ChunkingService::new(provider);

    if let Some(name) = config.default_language.as_deref() {
        let language = name.parse::<LanguageId>()?;
        service = service.with_fallback(RegistryFallback::Default(language));
    }
    if !config.kinds.is_empty() {
        service = service.with_filter(kinds_filter(config.kinds.iter().cloned()));
    }

    Ok(service)
}

/// Chunks files from disk
#[derive(Debug, Clone)]
pub struct ChunkIndexer {
    service: Arc<ChunkingService>,
    options: ScanOptions,
}

impl ChunkIndexer {
    pub fn new(service: ChunkingService, options: ScanOptions) -> Self {
        Self {
            service: Arc::new(service),
            options,
        }
    }

    pub fn service(&self) -> &ChunkingService {
        &self.service
    }

    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Chunk a single file; every chunk carries `path` as its file path
    ///
    /// # Errors
    /// - `Parsing(UnsupportedLanguage)` for an unmapped extension without a fallback
    /// - `FileTooLarge`, `BinaryFile` or `Io` when the file cannot be read as text
    /// - any chunking error from the grammar provider or parser
    pub async fn chunk_file(&self, path: &Path) -> IndexingResult<Vec<BoundaryChunk>> {
        let display = path.to_string_lossy().into_owned();
        self.chunk_one(path, display).await
    }

    /// Chunk every file under `root`
    ///
    /// Per-file problems land in [`DirectoryReport::failures`]; chunks and
    /// failures follow the walk order regardless of concurrency. File paths
    /// are relative to `root`.
    ///
    /// # Errors
    /// Returns `NotADirectory` or `Io` when `root` itself cannot be walked
    pub async fn chunk_directory(&self, root: &Path) -> IndexingResult<DirectoryReport> {
        let metadata = tokio::fs::metadata(root)
            .await
            .map_err(|e| IndexingError::io(root.to_string_lossy(), e))?;
        if !metadata.is_dir() {
            return Err(IndexingError::NotADirectory {
                path: root.to_string_lossy().into_owned(),
            });
        }

        let scanner = FileScanner::new(root, self.options.clone());
        let files = tokio::task::spawn_blocking(move || scanner.scan())
            .await
            .map_err(|e| IndexingError::TaskFailed(e.to_string()))?;

        let concurrency = self.options.concurrency.max(1);
        tracing::info!(
            root = %root.display(),
            files = files.len(),
            concurrency,
            "Chunking directory"
        );

        let outcomes: Vec<(String, IndexingResult<Vec<BoundaryChunk>>)> = stream::iter(files)
            .map(|path| async move {
                let relative = relative_path(root, &path);
                let outcome = self.chunk_one(&path, relative.clone()).await;
                (relative, outcome)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let mut report = DirectoryReport {
            files_scanned: outcomes.len(),
            ..DirectoryReport::default()
        };
        for (path, outcome) in outcomes {
            match outcome {
                Ok(chunks) => {
                    report.files_chunked = report.files_chunked.saturating_add(1);
                    report.chunks.extend(chunks);
                }
                Err(err) => {
                    let kind = err.failure_kind();
                    if kind == FailureKind::Unsupported {
                        tracing::debug!("Skipping {path}: {err}");
                    } else {
                        tracing::warn!("Failed to chunk {path}: {err}");
                    }
                    report.failures.push(FileFailure {
                        path,
                        kind,
                        message: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            files_scanned = report.files_scanned,
            files_chunked = report.files_chunked,
            chunks = report.chunks.len(),
            failures = report.failures.len(),
            "Directory chunking complete"
        );
        Ok(report)
    }

    async fn chunk_one(
        &self,
        path: &Path,
        file_path: String,
    ) -> IndexingResult<Vec<BoundaryChunk>> {
        let language = self.language_for(path, &file_path)?;

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| IndexingError::io(file_path.as_str(), e))?;
        if metadata.len() > self.options.max_file_bytes {
            return Err(IndexingError::FileTooLarge {
                path: file_path,
                size: metadata.len(),
                limit: self.options.max_file_bytes,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IndexingError::io(file_path.as_str(), e))?;
        let Some(decoded) = decode_source(&bytes) else {
            return Err(IndexingError::BinaryFile { path: file_path });
        };
        if decoded.encoding != "UTF-8" {
            tracing::debug!("Decoded {file_path} from {}", decoded.encoding);
        }

        let service = Arc::clone(&self.service);
        let chunks = tokio::task::spawn_blocking(move || {
            service.chunk_file_source(&decoded.text, language, file_path)
        })
        .await
        .map_err(|e| IndexingError::TaskFailed(e.to_string()))??;

        Ok(chunks)
    }

    fn language_for(&self, path: &Path, file_path: &str) -> IndexingResult<LanguageId> {
        if let Some(language) = LanguageId::from_path(path) {
            return Ok(language);
        }
        match self.service.fallback() {
            RegistryFallback::Default(language) => {
                tracing::debug!("No language for {file_path}, using {language}");
                Ok(language)
            }
            RegistryFallback::Strict => Err(ParsingError::unsupported_language(file_path).into()),
        }
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
