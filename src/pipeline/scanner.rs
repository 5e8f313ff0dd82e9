//! File Scanner
//!
//! Depth-first walk of a source tree, collecting every regular file whose
//! name ends with a given suffix. The whole tree is walked before anything
//! is returned.
//!
//! Ordering follows the directory listing as the OS returns it. No sort is
//! applied, so the order differs between platforms and filesystems.

use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// The scan could not complete. Fatal for a run.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Matches file names ending with a fixed suffix (`.dart`, `_test.dart`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixPredicate {
    suffix: String,
}

impl SuffixPredicate {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.suffix)
    }
}

/// Statistics from a scan operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Directories visited, root included
    pub total_dirs: usize,

    /// Regular files seen
    pub total_files: usize,

    /// Files accepted by the predicate
    pub matched_files: usize,

    /// Time taken to scan in milliseconds
    pub scan_duration_ms: u64,
}

/// Result of a completed scan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Absolute form of the requested root
    pub root: PathBuf,

    /// Matching files in discovery order, absolute
    pub files: Vec<PathBuf>,

    pub stats: ScanStats,
}

/// Depth-first directory scanner
#[derive(Debug, Clone)]
pub struct FileScanner {
    predicate: SuffixPredicate,
}

impl FileScanner {
    pub fn new(predicate: SuffixPredicate) -> Self {
        Self { predicate }
    }

    /// Walk `root` and collect matching files
    ///
    /// Any unreadable directory aborts the scan; no partial list is returned.
    /// Symbolic links are followed, so a linked file or directory is
    /// scanned like a real one. A link cycle is reported as a read error.
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome, ScanError> {
        let start = Instant::now();

        let root = std::fs::canonicalize(root).map_err(|source| ScanError::DirectoryRead {
            path: root.to_path_buf(),
            source,
        })?;

        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root));
        }

        let mut stats = ScanStats::default();
        let mut files = Vec::new();

        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                ScanError::DirectoryRead { path, source }
            })?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                stats.total_dirs += 1;
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            stats.total_files += 1;

            let matched = self.predicate.matches(&entry.file_name().to_string_lossy());
            if matched {
                files.push(entry.into_path());
            }
        }

        stats.matched_files = files.len();
        stats.scan_duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            root = %root.display(),
            suffix = self.predicate.suffix(),
            dirs = stats.total_dirs,
            files = stats.total_files,
            matched = stats.matched_files,
            "Scan complete in {}ms",
            stats.scan_duration_ms
        );

        Ok(ScanOutcome { root, files, stats })
    }
}
