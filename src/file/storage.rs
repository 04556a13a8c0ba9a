//! Blob storage for uploaded file content.
//!
//! Blobs are stored on disk under a configured root directory. Each
//! blob gets a UUID-based key and lands in a two-character shard
//! directory derived from that key, keeping any single directory from
//! growing unboundedly.
//!
//! ```text
//! {root}/
//! ├── ab/
//! │   └── ab12cd34-5678-90ab-cdef-123456789012.txt
//! ├── cd/
//! │   └── cd90ab12-3456-7890-abcd-ef1234567890.bin
//! └── ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{Result, StratusError};

/// Object store for file blobs.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a new BlobStore rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generate a storage key for a new blob.
    ///
    /// The key is a random UUID, keeping the extension of the original
    /// filename so stored blobs remain recognizable on disk.
    pub fn generate_key(original_name: &str) -> String {
        let uuid = Uuid::new_v4();
        match extract_extension(original_name) {
            Some(ext) => format!("{uuid}.{ext}"),
            None => uuid.to_string(),
        }
    }

    /// Save blob content under a freshly generated key.
    ///
    /// Returns the key the content was stored under.
    pub fn save(&self, original_name: &str, content: &[u8]) -> Result<String> {
        let key = Self::generate_key(original_name);
        self.save_with_key(&key, content)?;
        Ok(key)
    }

    /// Save blob content under a specific key.
    pub fn save_with_key(&self, key: &str, content: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(())
    }

    /// Load blob content by key.
    pub fn load(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(StratusError::NotFound(format!("blob {key}")));
        }
        Ok(fs::read(&path)?)
    }

    /// Delete a blob by key.
    ///
    /// Returns true if the blob existed and was removed, false if it
    /// was already gone. A missing blob is not an error so deletion
    /// stays idempotent under retry.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }

    /// Check whether a blob exists.
    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Get the size of a blob in bytes.
    pub fn size(&self, key: &str) -> Result<u64> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(StratusError::NotFound(format!("blob {key}")));
        }
        Ok(fs::metadata(&path)?.len())
    }

    /// Full filesystem path for a key.
    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(shard(key)).join(key)
    }
}

/// Shard directory for a key (first two characters).
fn shard(key: &str) -> String {
    key.chars().take(2).collect()
}

/// Extract a safe lowercase extension from a filename.
///
/// Only short alphanumeric extensions are kept; anything else is
/// dropped so a hostile filename cannot smuggle path characters into
/// the storage key.
fn extract_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?;
    if ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext.to_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (BlobStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = BlobStore::new(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_save_and_load() {
        let (store, _dir) = setup_store();

        let key = store.save("hello.txt", b"hello world").unwrap();
        assert!(key.ends_with(".txt"));

        let content = store.load(&key).unwrap();
        assert_eq!(content, b"hello world");
    }

    #[test]
    fn test_save_with_key() {
        let (store, _dir) = setup_store();

        store.save_with_key("ab-fixed-key.bin", b"data").unwrap();
        assert!(store.exists("ab-fixed-key.bin"));
        assert_eq!(store.load("ab-fixed-key.bin").unwrap(), b"data");
    }

    #[test]
    fn test_sharded_layout() {
        let (store, dir) = setup_store();

        let key = store.save("file.dat", b"x").unwrap();
        let expected_shard: String = key.chars().take(2).collect();
        assert!(dir.path().join(&expected_shard).join(&key).exists());
    }

    #[test]
    fn test_load_missing() {
        let (store, _dir) = setup_store();

        let result = store.load("nope");
        assert!(matches!(result, Err(StratusError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (store, _dir) = setup_store();

        let key = store.save("bye.txt", b"gone soon").unwrap();
        assert!(store.delete(&key).unwrap());
        assert!(!store.exists(&key));

        // A second delete is a no-op, not an error
        assert!(!store.delete(&key).unwrap());
    }

    #[test]
    fn test_size() {
        let (store, _dir) = setup_store();

        let key = store.save("sized.bin", &[0u8; 1234]).unwrap();
        assert_eq!(store.size(&key).unwrap(), 1234);
        assert!(store.size("missing").is_err());
    }

    #[test]
    fn test_generate_key_keeps_extension() {
        let key = BlobStore::generate_key("photo.JPEG");
        assert!(key.ends_with(".jpeg"));

        let key = BlobStore::generate_key("noext");
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_generate_key_rejects_hostile_extension() {
        let key = BlobStore::generate_key("evil.tar/../../x");
        assert!(!key.contains('/'));
        assert!(!key.contains(".."));

        let key = BlobStore::generate_key("weird.ex!t");
        assert!(!key.contains('!'));
    }

    #[test]
    fn test_unique_keys() {
        let k1 = BlobStore::generate_key("same.txt");
        let k2 = BlobStore::generate_key("same.txt");
        assert_ne!(k1, k2);
    }
}
