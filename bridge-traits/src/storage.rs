//! Storage and File System Abstractions
//!
//! The admin upload flow picks media from the device (photo library, document
//! picker, plain paths on desktop) and hands the core a local path. These
//! traits give the core read access to such paths without assuming a real
//! POSIX filesystem.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// File metadata information
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
    pub is_directory: bool,
}

/// File system access trait
///
/// Abstracts file reads to support different platforms:
/// - Desktop: Direct filesystem access
/// - iOS/Android: Sandboxed app directories, picker-provided URIs
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn load_cover(fs: &dyn FileSystemAccess, path: &Path) -> Result<Bytes> {
///     if !fs.exists(path).await? {
///         return Err(BridgeError::NotAvailable(path.display().to_string()));
///     }
///     fs.read_file(path).await
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get metadata for a file or directory
    async fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    /// Read entire file contents into memory
    ///
    /// Lesson media is small enough (a few minutes of audio or short clips)
    /// that uploads buffer the whole file.
    async fn read_file(&self, path: &Path) -> Result<Bytes>;
}
