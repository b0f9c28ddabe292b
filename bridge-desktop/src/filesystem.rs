//! File System Access Implementation using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::{FileMetadata, FileSystemAccess},
};
use bytes::Bytes;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use tracing::debug;

/// Tokio-based file system implementation
///
/// Reads files picked by the user for upload. Paths are used as given; the
/// desktop build has no sandbox to resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn map_io_error(e: std::io::Error) -> BridgeError {
        BridgeError::Io(e)
    }

    fn unix_seconds(time: std::io::Result<SystemTime>) -> Option<i64> {
        time.ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
    }
}

#[async_trait]
impl FileSystemAccess for TokioFileSystem {
    async fn exists(&self, path: &Path) -> Result<bool> {
        fs::try_exists(path).await.map_err(Self::map_io_error)
    }

    async fn metadata(&self, path: &Path) -> Result<FileMetadata> {
        let metadata = fs::metadata(path).await.map_err(Self::map_io_error)?;

        Ok(FileMetadata {
            size: metadata.len(),
            created_at: Self::unix_seconds(metadata.created()),
            modified_at: Self::unix_seconds(metadata.modified()),
            is_directory: metadata.is_dir(),
        })
    }

    async fn read_file(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path).await.map_err(Self::map_io_error)?;
        debug!(path = ?path, size = data.len(), "Read file");
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[tokio::test]
    async fn test_read_existing_file() {
        let fs = TokioFileSystem::new();
        let test_file = env::temp_dir().join(format!("bienestar-fs-{}.txt", std::process::id()));
        tokio::fs::write(&test_file, b"respira").await.unwrap();

        assert!(fs.exists(&test_file).await.unwrap());
        let metadata = fs.metadata(&test_file).await.unwrap();
        assert_eq!(metadata.size, 7);
        assert!(!metadata.is_directory);

        let data = fs.read_file(&test_file).await.unwrap();
        assert_eq!(data, Bytes::from_static(b"respira"));

        tokio::fs::remove_file(&test_file).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let fs = TokioFileSystem::new();
        let missing = env::temp_dir().join("bienestar-definitely-missing.bin");

        assert!(!fs.exists(&missing).await.unwrap());
        let err = fs.read_file(&missing).await.unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
