//! Error types for the catalog.

use std::path::{Path, PathBuf};

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No record with this id.
    #[error("product not found: {id}")]
    NotFound { id: Uuid },

    /// Required field missing or blank.
    #[error("invalid product: {message}")]
    Invalid { message: String },

    /// Store file could not be read or written.
    #[error("store I/O error at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    /// Store file exists but is not a JSON array of records.
    #[error("store file {} is corrupt: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

impl CatalogError {
    pub(crate) fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 1,
            Self::Invalid { .. } => 2,
            Self::Io { .. } | Self::Corrupt { .. } => 5,
        }
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
