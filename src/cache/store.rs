//! File-backed cache for normalized daily-record payloads.
//!
//! One JSON file per key under a per-metric namespace directory. Writes are
//! atomic (write to a temp file in the target directory, then rename), so a
//! crash mid-write never corrupts a previously valid entry. Reads return
//! stale entries too; freshness is the caller's decision via [`CacheStore::is_fresh`].

use crate::cache::key::CacheKey;
use crate::types::daily::DailyRecord;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::{fs, task};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to create cache directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("failed to read cache file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to write cache file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("failed to serialize cache entry for '{0}'")]
    Serialize(PathBuf, #[source] serde_json::Error),

    #[error("background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// One stored payload with its freshness metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fetched_at: DateTime<Utc>,
    pub ttl_seconds: u64,
    pub payload: Vec<DailyRecord>,
}

/// Disk cache instance; one per run, explicitly passed to the resolver so
/// tests can point it at a temp directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    base_dir: PathBuf,
}

impl CacheStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, namespace: &str, key: &CacheKey) -> PathBuf {
        self.base_dir
            .join(namespace)
            .join(format!("{}.json", key.file_stem()))
    }

    /// Reads an entry, stale or not. A missing file is `None`; an unreadable
    /// or undecodable file is logged and treated as absent rather than
    /// failing the resolution.
    pub async fn get(&self, namespace: &str, key: &CacheKey) -> Option<CacheEntry> {
        let path = self.path_for(namespace, key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("cache read failed for {:?}: {e}", path);
                return None;
            }
        };
        match serde_json::from_slice::<CacheEntry>(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("discarding undecodable cache entry {:?}: {e}", path);
                None
            }
        }
    }

    /// Writes an entry atomically, overwriting any previous one for the key.
    pub async fn put(
        &self,
        namespace: &str,
        key: &CacheKey,
        payload: Vec<DailyRecord>,
        fetched_at: DateTime<Utc>,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        let path = self.path_for(namespace, key);
        let dir = path
            .parent()
            .expect("cache paths always have a namespace parent")
            .to_path_buf();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| CacheError::DirCreation(dir.clone(), e))?;

        let entry = CacheEntry {
            fetched_at,
            ttl_seconds,
            payload,
        };

        task::spawn_blocking(move || {
            let bytes =
                serde_json::to_vec(&entry).map_err(|e| CacheError::Serialize(path.clone(), e))?;
            let mut temp = tempfile::NamedTempFile::new_in(&dir)
                .map_err(|e| CacheError::Write(path.clone(), e))?;
            std::io::Write::write_all(&mut temp, &bytes)
                .map_err(|e| CacheError::Write(path.clone(), e))?;
            temp.persist(&path)
                .map_err(|e| CacheError::Write(path, e.error))?;
            Ok::<(), CacheError>(())
        })
        .await??;
        Ok(())
    }

    /// Whether an entry is within its TTL, measured from now.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        let age = Utc::now() - entry.fetched_at;
        age.num_seconds() <= entry.ttl_seconds as i64
    }
}
