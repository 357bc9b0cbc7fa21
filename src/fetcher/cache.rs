//! Content-addressed page cache
//!
//! Pages are stored in a flat directory, one file per URL, named by the
//! lowercase hex SHA-256 digest of the exact URL string. Files hold the raw
//! body with no metadata. Entries are never evicted or expired.

use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Number of write locks shared by all keys
const LOCK_SHARDS: usize = 16;

/// Computes the cache key for a URL
///
/// # Example
///
/// ```
/// use sumi_glean::fetcher::cache_key;
///
/// let key = cache_key("https://example.com/");
/// assert_eq!(key.len(), 64);
/// assert_eq!(key, key.to_lowercase());
/// ```
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Disk-backed page store
///
/// Reads and writes are synchronous. Writes to the same key are serialized
/// through one of a fixed set of lock shards and land atomically via a temp
/// file and rename, so a concurrent reader never observes a partial body.
#[derive(Debug)]
pub struct PageStore {
    dir: PathBuf,
    write_locks: [Mutex<()>; LOCK_SHARDS],
}

impl PageStore {
    /// Opens a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_locks: std::array::from_fn(|_| Mutex::new(())),
        })
    }

    /// The directory this store writes to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache file for `url`
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(cache_key(url))
    }

    /// Reads the cached body for `url`, if present
    pub fn get(&self, url: &str) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(url)) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stores `body` for `url`
    pub fn put(&self, url: &str, body: &str) -> std::io::Result<()> {
        let key = cache_key(url);
        let _guard = self.write_locks[shard_for(&key)]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let final_path = self.dir.join(&key);
        let tmp_path = self
            .dir
            .join(format!(".{}.{}.tmp", key, std::process::id()));

        std::fs::write(&tmp_path, body)?;
        if let Err(e) = std::fs::rename(&tmp_path, &final_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }
        Ok(())
    }
}

/// Picks the write lock shard for a hex cache key
fn shard_for(key: &str) -> usize {
    key.get(..2)
        .and_then(|prefix| usize::from_str_radix(prefix, 16).ok())
        .unwrap_or(0)
        % LOCK_SHARDS
}
