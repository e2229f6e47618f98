//! Errors raised while loading binding files.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Loading bindings failed.
#[derive(Debug, Error)]
pub enum BindingsError {
    /// None of the candidate files exists.
    #[error("no bindings file found (searched: {})", display_paths(.searched))]
    FileNotFound {
        /// Every path that was tried, in load order.
        searched: Vec<PathBuf>,
    },

    /// The markup is not a valid bindings document.
    #[error("{}:{line}:{column}: {message}", .path.display())]
    MalformedConfig {
        /// File (or placeholder name) being parsed.
        path: PathBuf,
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
        /// Human-readable description.
        message: String,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// An invariant of the loader did not hold.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BindingsError {
    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::MalformedConfig { path, .. } | Self::Io { path, .. } => Some(path),
            Self::FileNotFound { .. } | Self::Internal(_) => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
