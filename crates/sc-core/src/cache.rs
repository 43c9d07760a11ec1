//! Ambient on-disk response cache (§10.4), keyed by [`sc_schema::util::jsoned_hash`]
//! over whatever arguments an adapter call used to fetch the value. Purely an
//! adapter convenience — the pipeline driver never reads or writes it itself.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;

/// A disabled cache (the CLI's `--no-cache` flag) always misses and never
/// writes, so adapters can hold a `DiskCache` unconditionally rather than an
/// `Option<DiskCache>`.
#[derive(Clone)]
pub struct DiskCache {
    dir: PathBuf,
    ttl: Duration,
    enabled: bool,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration, enabled: bool) -> Self {
        Self { dir: dir.into(), ttl, enabled }
    }

    pub fn disabled() -> Self {
        Self { dir: PathBuf::new(), ttl: Duration::ZERO, enabled: false }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Returns `None` on a cache miss, an expired entry, a corrupt file, or
    /// when the cache is disabled — all treated the same by callers, which
    /// just fall through to a live fetch.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let path = self.path_for(key);
        let metadata = tokio::fs::metadata(&path).await.ok()?;
        let modified = metadata.modified().ok()?;
        if SystemTime::now().duration_since(modified).unwrap_or(Duration::MAX) > self.ttl {
            debug!(key, "cache entry expired");
            return None;
        }
        let bytes = tokio::fs::read(&path).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, %err, "cache entry is corrupt, ignoring");
                None
            }
        }
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let bytes = serde_json::to_vec(value).map_err(sc_schema::Error::Json)?;
        tokio::fs::write(self.path_for(key), bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Sample {
        value: u32,
    }

    #[tokio::test]
    async fn disabled_cache_always_misses() {
        let cache = DiskCache::disabled();
        cache.put("k", &Sample { value: 1 }).await.expect("put on disabled cache is a no-op");
        assert!(cache.get::<Sample>("k").await.is_none());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = DiskCache::new(dir.path(), Duration::from_secs(60), true);
        cache.put("k", &Sample { value: 42 }).await.expect("put succeeds");
        let got: Sample = cache.get("k").await.expect("get hits");
        assert_eq!(got, Sample { value: 42 });
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = DiskCache::new(dir.path(), Duration::ZERO, true);
        cache.put("k", &Sample { value: 7 }).await.expect("put succeeds");
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.get::<Sample>("k").await.is_none());
    }
}
