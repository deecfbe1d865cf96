//! Poster resolution with a bounded fallback chain.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::storage::{cache_key, PosterStorage};
use crate::config::CacheConfig;
use crate::metadata::{MetadataProvider, PosterQuery};

/// Where a title's artwork can be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PosterRef {
    /// Stored locally under `key`.
    Cached { key: String, path: PathBuf },
    /// Could not be cached; render the remote URL as-is.
    Unresolved { url: String },
}

impl PosterRef {
    /// Link to render for this poster. Cached entries are served from `/temp`.
    pub fn href(&self) -> String {
        match self {
            PosterRef::Cached { key, .. } => format!("/temp/{key}.jpg"),
            PosterRef::Unresolved { url } => url.clone(),
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, PosterRef::Cached { .. })
    }
}

/// Write-once local poster cache in front of a [`MetadataProvider`].
///
/// A hit never touches the network. A miss downloads, shrinks and stores
/// the image; concurrent misses on the same key share a single download.
/// When a URL cannot be cached and a [`PosterQuery`] is available, the
/// provider is asked for a replacement URL, up to `max_fallback_depth` times.
#[derive(Clone)]
pub struct PosterCache {
    storage: PosterStorage,
    client: reqwest::Client,
    provider: Arc<dyn MetadataProvider>,
    max_depth: u32,
    max_bytes: u64,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl fmt::Debug for PosterCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosterCache")
            .field("storage", &self.storage)
            .field("provider", &self.provider.name())
            .field("max_depth", &self.max_depth)
            .field("max_bytes", &self.max_bytes)
            .field("in_flight", &self.locks.len())
            .finish()
    }
}

impl PosterCache {
    pub fn new(config: &CacheConfig, provider: Arc<dyn MetadataProvider>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .context("Failed to build HTTP client for poster downloads")?;

        Ok(Self {
            storage: PosterStorage::new(
                config.dir.clone(),
                config.max_width,
                config.max_height,
            ),
            client,
            provider,
            max_depth: config.max_fallback_depth,
            max_bytes: config.max_download_bytes,
            locks: Arc::new(DashMap::new()),
        })
    }

    pub fn storage(&self) -> &PosterStorage {
        &self.storage
    }

    pub fn provider(&self) -> &Arc<dyn MetadataProvider> {
        &self.provider
    }

    /// Resolve `url` to a local poster.
    ///
    /// Never fails: when neither `url` nor any replacement from the provider
    /// can be cached, the original `url` comes back as
    /// [`PosterRef::Unresolved`]. A replacement already tried during this call
    /// ends the chain.
    pub async fn resolve(&self, url: &str, fallback: Option<&PosterQuery>) -> PosterRef {
        let mut current = url.to_string();
        let mut tried = HashSet::new();
        let mut depth = 0;

        loop {
            match self.resolve_one(&current).await {
                Ok(poster) => return poster,
                Err(e) => warn!(url = %current, error = %e, "Failed to cache poster"),
            }
            tried.insert(current.clone());

            let Some(query) = fallback else {
                break;
            };
            if depth >= self.max_depth {
                warn!(
                    title = %query.title,
                    depth,
                    "Poster fallback limit reached"
                );
                break;
            }
            depth += 1;

            match self.provider.search_poster(query).await {
                Ok(Some(next)) if tried.contains(&next) => {
                    debug!(url = %next, "Provider returned a URL that already failed");
                    break;
                }
                Ok(Some(next)) => {
                    info!(title = %query.title, url = %next, depth, "Retrying with fallback poster");
                    current = next;
                }
                Ok(None) => {
                    debug!(title = %query.title, "Provider has no fallback poster");
                    break;
                }
                Err(e) => {
                    warn!(title = %query.title, error = %e, "Fallback poster search failed");
                    break;
                }
            }
        }

        PosterRef::Unresolved {
            url: url.to_string(),
        }
    }

    /// Resolve a single URL without fallback.
    async fn resolve_one(&self, url: &str) -> Result<PosterRef> {
        let key = cache_key(url);
        if let Some(path) = self.storage.lookup(&key) {
            debug!(key, "Poster cache hit");
            return Ok(PosterRef::Cached { key, path });
        }

        let lock = self.locks.entry(key.clone()).or_default().value().clone();
        let result = {
            let _guard = lock.lock().await;
            self.download_and_store(&key, url).await
        };
        drop(lock);
        self.locks
            .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn download_and_store(&self, key: &str, url: &str) -> Result<PosterRef> {
        // Another task may have filled the entry while we waited on the lock.
        if let Some(path) = self.storage.lookup(key) {
            debug!(key, "Poster cached by concurrent request");
            return Ok(PosterRef::Cached {
                key: key.to_string(),
                path,
            });
        }

        debug!(url, key, "Downloading poster");
        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to download poster: {url}"))?
            .error_for_status()
            .with_context(|| format!("Poster download returned an error status: {url}"))?;

        if let Some(len) = resp.content_length() {
            if len > self.max_bytes {
                bail!("Poster too large ({len} bytes, limit {}): {url}", self.max_bytes);
            }
        }

        // Content-Length is optional; the cap also applies while reading.
        let mut bytes = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .context("Failed to read poster response body")?
        {
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                bail!("Poster body exceeds {} bytes: {url}", self.max_bytes);
            }
            bytes.extend_from_slice(&chunk);
        }

        let storage = self.storage.clone();
        let owned_key = key.to_string();
        let path = tokio::task::spawn_blocking(move || storage.store(&owned_key, &bytes))
            .await
            .context("Poster store task panicked")??;

        Ok(PosterRef::Cached {
            key: key.to_string(),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DisabledProvider;

    #[test]
    fn href_for_cached_and_unresolved() {
        let cached = PosterRef::Cached {
            key: "abc".to_string(),
            path: PathBuf::from("temp/abc.jpg"),
        };
        assert_eq!(cached.href(), "/temp/abc.jpg");
        assert!(cached.is_cached());

        let unresolved = PosterRef::Unresolved {
            url: "http://x/a.jpg".to_string(),
        };
        assert_eq!(unresolved.href(), "http://x/a.jpg");
        assert!(!unresolved.is_cached());
    }

    #[test]
    fn poster_ref_serializes_with_state_tag() {
        let json = serde_json::to_value(PosterRef::Unresolved {
            url: "http://x/a.jpg".to_string(),
        })
        .unwrap();
        assert_eq!(json["state"], "unresolved");
        assert_eq!(json["url"], "http://x/a.jpg");
    }

    #[tokio::test]
    async fn unreachable_url_without_fallback_is_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            dir: dir.path().to_path_buf(),
            fetch_timeout_secs: 1,
            ..CacheConfig::default()
        };
        let cache = PosterCache::new(&config, Arc::new(DisabledProvider)).unwrap();

        let poster = cache.resolve("http://127.0.0.1:1/a.jpg", None).await;
        assert_eq!(
            poster,
            PosterRef::Unresolved {
                url: "http://127.0.0.1:1/a.jpg".to_string()
            }
        );
        assert!(cache.storage().entries().unwrap().is_empty());
    }
}
