//! Artifact persistence and cleanup
//!
//! Writes are last-write-wins: an existing file at the output path is
//! replaced without warning.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The filesystem refused a write. Fatal for a run.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Text cleanup applied to an artifact before it is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcess {
    /// Write the artifact exactly as returned
    Verbatim,

    /// Strip markdown fences and make sure `required_import` is present
    SourceCode { required_import: String },
}

impl PostProcess {
    pub fn apply(&self, artifact: &str) -> String {
        match self {
            PostProcess::Verbatim => artifact.to_string(),
            PostProcess::SourceCode { required_import } => {
                ensure_import(&strip_fences(artifact), required_import)
            }
        }
    }
}

/// A line that only opens or closes a fenced block, e.g. "```dart"
fn is_fence_line(line: &str) -> bool {
    line.trim()
        .strip_prefix("```")
        .map(|tag| {
            tag.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.'))
        })
        .unwrap_or(false)
}

/// Remove fence markers from model output
///
/// Whole fence lines are dropped; a stray marker inside a line is removed
/// in place.
pub fn strip_fences(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !is_fence_line(line))
        .map(|line| line.replace("```", ""))
        .collect()
}

/// Prepend `import` on its own line unless it already appears
pub fn ensure_import(code: &str, import: &str) -> String {
    if import.is_empty() || code.contains(import) {
        return code.to_string();
    }
    format!("{}\n{}", import, code)
}

/// Persists artifacts to disk
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriter;

impl OutputWriter {
    pub fn new() -> Self {
        Self
    }

    /// Create missing parent directories, then write `content` to `path`
    pub async fn write(&self, path: &Path, content: &str) -> Result<(), WriteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|source| WriteError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}
