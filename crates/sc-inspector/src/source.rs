//! Where the inspector dataset comes from.
//!
//! The dataset is fetched once per process and treated as read-only
//! afterwards (§5's "process-global, read-only after initial fetch"
//! resource note) — `HttpArchiveSource` fetches and extracts it lazily on
//! first use and hands back the same extracted directory on every later
//! call. `FixtureSource` skips the network entirely and points straight at
//! an already-extracted directory, which is all tests need.

use std::path::PathBuf;

use async_trait::async_trait;
use flate2::read::GzDecoder;
use tar::Archive;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Hands back the root of the extracted dataset, fetching it if necessary.
#[async_trait]
pub trait InspectorSource: Send + Sync {
    async fn root(&self) -> Result<PathBuf>;
}

/// Fetches a `.tar.gz` archive over HTTP and extracts it into a temporary
/// directory the first time `root()` is called; later calls reuse the same
/// extraction. The temp directory is removed when the source is dropped.
pub struct HttpArchiveSource {
    url: String,
    client: reqwest::Client,
    extracted: OnceCell<PathBuf>,
    _dir: OnceCell<tempfile::TempDir>,
}

impl HttpArchiveSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            extracted: OnceCell::new(),
            _dir: OnceCell::new(),
        }
    }

    async fn fetch_and_extract(&self) -> Result<PathBuf> {
        info!(url = %self.url, "fetching inspector dataset archive");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| Error::Fetch { url: self.url.clone(), source })?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| Error::Fetch { url: self.url.clone(), source })?;

        let dir = tempfile::tempdir().map_err(Error::Extract)?;
        let root = dir.path().to_path_buf();
        let archive_bytes = bytes.to_vec();
        let extract_root = root.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let tar = GzDecoder::new(&archive_bytes[..]);
            let mut archive = Archive::new(tar);
            archive.unpack(&extract_root)
        })
        .await
        .map_err(|err| Error::Extract(std::io::Error::other(err)))?
        .map_err(Error::Extract)?;

        self._dir
            .set(dir)
            .unwrap_or_else(|_| unreachable!("fetch_and_extract runs at most once"));
        debug!(path = %root.display(), "extracted inspector dataset archive");
        Ok(root)
    }
}

#[async_trait]
impl InspectorSource for HttpArchiveSource {
    async fn root(&self) -> Result<PathBuf> {
        self.extracted
            .get_or_try_init(|| self.fetch_and_extract())
            .await
            .cloned()
    }
}

/// Points at a directory that is already laid out like the extracted
/// dataset — a fixture directory in tests, or a pre-extracted archive on
/// disk in development.
pub struct FixtureSource {
    root: PathBuf,
}

impl FixtureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl InspectorSource for FixtureSource {
    async fn root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_source_returns_configured_root() {
        let dir = tempfile::tempdir().unwrap();
        let source = FixtureSource::new(dir.path());
        assert_eq!(source.root().await.unwrap(), dir.path());
    }
}
