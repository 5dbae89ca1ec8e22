//! Error types for mesh operations.
//!
//! Geometric operations never fail on degenerate input; they count and report
//! anomalies instead. Errors are reserved for file I/O and invalid parameters.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Error reading from a file.
    #[error("failed to read mesh from {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to a file.
    #[error("failed to write mesh to {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing mesh file format.
    #[error("failed to parse mesh from {path}: {details}")]
    ParseError { path: PathBuf, details: String },

    /// Unsupported file format.
    #[error("unsupported mesh format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },

    /// File parsed but held no facets.
    #[error("mesh is empty: {details}")]
    EmptyMesh { details: String },

    /// Classifier tolerances out of range.
    #[error("invalid parameters: {details}")]
    InvalidParams { details: String },
}

impl MeshError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoWrite {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams {
            details: details.into(),
        }
    }
}
