//! Output path derivation
//!
//! Maps a source file to its output location by rebasing it from an input
//! root onto an output root and swapping its trailing suffix. The mapping
//! depends on nothing but its arguments.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A source path that cannot be mapped. The file is skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("{path} is not under input root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{path} does not end with {suffix:?}")]
    SuffixMismatch { path: PathBuf, suffix: String },

    #[error("Naming collision: {suffix:?} appears more than once in {path}")]
    NamingCollision { path: PathBuf, suffix: String },

    #[error("{path} is not valid UTF-8")]
    NonUtf8 { path: PathBuf },
}

/// Replace a trailing `from` with `to`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixRule {
    pub from: String,
    pub to: String,
}

impl SuffixRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Derive where the artifact for `source` is written
///
/// Only the trailing occurrence of `rule.from` is replaced. Any other
/// occurrence in the path below `input_root` is reported as a collision
/// instead of guessing which one was meant. Paths below `input_root` must
/// be valid UTF-8.
pub fn derive_output_path(
    source: &Path,
    input_root: &Path,
    output_root: &Path,
    rule: &SuffixRule,
) -> Result<PathBuf, PathError> {
    let relative = source
        .strip_prefix(input_root)
        .map_err(|_| PathError::OutsideRoot {
            path: source.to_path_buf(),
            root: input_root.to_path_buf(),
        })?;

    // A lossy conversion would map distinct names onto the same output
    let relative_str = relative.to_str().ok_or_else(|| PathError::NonUtf8 {
        path: source.to_path_buf(),
    })?;

    let stem = relative_str
        .strip_suffix(rule.from.as_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| PathError::SuffixMismatch {
            path: source.to_path_buf(),
            suffix: rule.from.clone(),
        })?;

    if stem.contains(rule.from.as_str()) {
        return Err(PathError::NamingCollision {
            path: source.to_path_buf(),
            suffix: rule.from.clone(),
        });
    }

    Ok(output_root.join(format!("{}{}", stem, rule.to)))
}
