//! Directory walking for chunkable files

use crate::indexer::ScanOptions;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Lists files under a root directory, honoring ignore files
///
/// Every regular file is returned; deciding whether a file can be chunked
/// is left to the caller so that skips can be reported.
pub struct FileScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, options: ScanOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    /// Files under the root in a stable, depth-first, name-sorted order
    pub fn scan(&self) -> Vec<PathBuf> {
        let respect = self.options.respect_gitignore;
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(!self.options.include_hidden)
            .follow_links(self.options.follow_links)
            .git_ignore(respect)
            .git_global(respect)
            .git_exclude(respect)
            .ignore(respect)
            .parents(respect)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut files = Vec::new();
        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|file_type| file_type.is_file()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => tracing::warn!("Failed to read entry: {e}"),
            }
        }

        tracing::debug!(
            root = %self.root.display(),
            files = files.len(),
            "Scanned directory"
        );
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|path| {
                path.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_respects_gitignore_and_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(".gitignore"), "build/\n").unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("build/out.js"), "let a;").unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join(".cache/tmp.py"), "x = 1").unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();

        let files = FileScanner::new(root, ScanOptions::default()).scan();
        assert_eq!(names(root, &files), vec!["main.rs"]);
    }

    #[test]
    fn test_scan_can_include_ignored_and_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(".gitignore"), "gen.rs\n").unwrap();
        fs::write(root.join("gen.rs"), "fn g() {}").unwrap();

        let options = ScanOptions {
            respect_gitignore: false,
            include_hidden: true,
            ..ScanOptions::default()
        };
        let files = FileScanner::new(root, options).scan();
        assert_eq!(names(root, &files), vec![".gitignore", "gen.rs"]);
    }

    #[test]
    fn test_scan_order_is_depth_first_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("b/inner.go"), "package b").unwrap();
        fs::write(root.join("a.py"), "").unwrap();
        fs::write(root.join("c.rb"), "").unwrap();

        let files = FileScanner::new(root, ScanOptions::default()).scan();
        assert_eq!(names(root, &files), vec!["a.py", "b/inner.go", "c.rb"]);
    }
}
