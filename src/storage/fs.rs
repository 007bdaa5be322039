//! Local filesystem implementation of [`MirrorStore`]

use crate::storage::traits::{MirrorStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::Path;

/// Writes the mirror to the local filesystem through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MirrorStore for FsStore {
    async fn create_dir_all(&self, dir: &Path) -> StorageResult<()> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })
    }

    async fn write_file(&self, path: &Path, body: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent).await?;
        }

        tokio::fs::write(path, body)
            .await
            .map_err(|source| StorageError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::trace!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(())
    }
}
