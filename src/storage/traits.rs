//! Storage traits and error types
//!
//! This module defines the narrow interface the crawler needs from the
//! filesystem: make sure a directory exists, and write a file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for mirror storage backends
///
/// Implementations must be safe to call from many tasks at once. The crawler
/// guarantees that concurrent writes target different paths.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Creates `dir` and any missing parents
    async fn create_dir_all(&self, dir: &Path) -> StorageResult<()>;

    /// Writes `body` to `path`, creating parent directories as needed
    ///
    /// An existing file at `path` is replaced.
    async fn write_file(&self, path: &Path, body: &[u8]) -> StorageResult<()>;
}
