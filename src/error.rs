//! Error types for distpack

use std::path::{Path, PathBuf};

/// Result type for packaging operations
pub type Result<T> = std::result::Result<T, PackagingError>;

/// Errors that abort a packaging run. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum PackagingError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error(
        "Could not find the '{launcher}' executable on the search path (searched: {})",
        display_paths(.searched)
    )]
    LauncherNotFound {
        launcher: String,
        searched: Vec<PathBuf>,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest to JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse manifest JSON from {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("Invalid distribution at {root}: {message}")]
    InvalidDistribution { root: PathBuf, message: String },
}

impl PackagingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    pub fn invalid_distribution(root: &Path, message: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            root: root.to_path_buf(),
            message: message.into(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<empty>".to_string();
    }

    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
