use crate::error::{LoginError, Result};
use crate::expiry::{self, Clock};
use crate::models::CachedCredential;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Key/value storage for serialized cache records
pub trait CacheStore {
    /// `Ok(None)` when nothing is stored under `key`
    fn load(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value under `key`; readers see either the old or the new value
    fn store(&self, key: &str, contents: &str) -> io::Result<()>;
}

/// One file per key inside a cache directory
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    fn file_path(&self, key: &str) -> io::Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid cache key: {}", key),
            ));
        }
        Ok(self.cache_dir.join(key))
    }
}

impl CacheStore for FileStore {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.file_path(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn store(&self, key: &str, contents: &str) -> io::Result<()> {
        let path = self.file_path(key)?;

        // Create cache directory if it doesn't exist
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir)?;
        }

        // Temp file in the same directory so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&self.cache_dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        Ok(())
    }
}

/// Per-account credential cache
pub struct CredentialCache {
    store: Box<dyn CacheStore>,
    clock: Arc<dyn Clock>,
}

impl CredentialCache {
    pub fn new(store: Box<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Cache file name for an account
    pub fn cache_key(account_id: &str) -> String {
        format!("aws-login-{}.json", account_id)
    }

    /// Get cached credentials that stay valid for at least `min_duration_secs`
    pub fn get(&self, account_id: &str, min_duration_secs: u32) -> Result<Option<CachedCredential>> {
        let key = Self::cache_key(account_id);

        let contents = self
            .store
            .load(&key)
            .map_err(|source| LoginError::CacheReadFailed {
                account_id: account_id.to_string(),
                source,
            })?;

        let Some(contents) = contents else {
            tracing::debug!("No cached credentials for {}", account_id);
            return Ok(None);
        };

        let creds: CachedCredential =
            serde_json::from_str(&contents).map_err(|source| LoginError::CacheCorrupt {
                account_id: account_id.to_string(),
                source,
            })?;

        if !expiry::is_fresh(self.clock.now(), min_duration_secs, creds.expires_at) {
            tracing::debug!(
                "Cached credentials for {} expire at {}, need {}s",
                account_id,
                creds.expires_at,
                min_duration_secs
            );
            return Ok(None);
        }

        Ok(Some(creds))
    }

    /// Save credentials to cache, replacing any previous record
    pub fn put(&self, account_id: &str, creds: &CachedCredential) -> Result<()> {
        let key = Self::cache_key(account_id);

        let json = serde_json::to_string_pretty(creds).map_err(|e| LoginError::CacheWriteFailed {
            account_id: account_id.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        self.store
            .store(&key, &json)
            .map_err(|source| LoginError::CacheWriteFailed {
                account_id: account_id.to_string(),
                source,
            })?;

        tracing::debug!("Cached credentials for {}", account_id);
        Ok(())
    }
}
