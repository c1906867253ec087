//! Blob storage for original uploads and plain-text renditions

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Trait for opaque byte storage
///
/// Implementations:
/// - `LocalBlobStore`: filesystem directory
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under a key, returning a URI for the stored blob
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String>;

    /// Fetch bytes by key
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Delete a blob; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Filesystem-backed blob store
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a store rooted at a directory, creating it if needed
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .map_err(|e| Error::Storage(format!("Failed to create blob dir: {}", e)))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        // Keys are generated internally, but reject separators anyway
        if key.contains('/') || key.contains("..") {
            return Err(Error::Storage(format!("Invalid blob key: {}", key)));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write blob '{}': {}", key, e)))?;
        Ok(format!("file://{}", path.display()))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to read blob '{}': {}", key, e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!(
                "Failed to delete blob '{}': {}",
                key, e
            ))),
        }
    }

    fn name(&self) -> &str {
        "local-fs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_path_buf()).unwrap();

        let uri = store.put("doc.bin", b"payload").await.unwrap();
        assert!(uri.starts_with("file://"));
        assert_eq!(store.get("doc.bin").await.unwrap(), b"payload");

        store.delete("doc.bin").await.unwrap();
        assert!(store.get("doc.bin").await.is_err());
    }

    #[tokio::test]
    async fn delete_missing_key_succeeds() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_path_buf()).unwrap();
        store.delete("never-stored").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_path_traversal_keys() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_path_buf()).unwrap();
        assert!(store.get("../etc/passwd").await.is_err());
    }
}
