use reelshelf_common::paths::media_extensions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Which remote search API supplies poster URLs.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Tmdb,
    Omdb,
    /// Never look anything up.
    None,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,

    #[serde(default)]
    pub api_key: String,

    /// Override for the search API root (defaults depend on `kind`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Prefix joined with TMDB `poster_path` fragments
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    #[serde(default)]
    pub language: Option<String>,

    /// Request timeout for search calls in seconds (default: 10)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key: String::new(),
            base_url: None,
            image_base_url: default_image_base_url(),
            language: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory walked by `scan`
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Lowercase extensions treated as media (default: mp4, mkv, avi, mov)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    media_extensions().iter().map(|e| e.to_string()).collect()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: None,
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// How many provider re-lookups a failing poster may trigger (default: 3)
    #[serde(default = "default_max_fallback_depth")]
    pub max_fallback_depth: u32,

    /// Artwork download timeout in seconds (default: 5)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_max_width")]
    pub max_width: u32,

    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Largest artwork response accepted, in bytes (default: 10 MiB)
    #[serde(default = "default_max_download_bytes")]
    pub max_download_bytes: u64,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_max_fallback_depth() -> u32 {
    3
}

fn default_fetch_timeout() -> u64 {
    5
}

fn default_max_width() -> u32 {
    200
}

fn default_max_height() -> u32 {
    300
}

fn default_max_download_bytes() -> u64 {
    10 * 1024 * 1024
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            max_fallback_depth: default_max_fallback_depth(),
            fetch_timeout_secs: default_fetch_timeout(),
            max_width: default_max_width(),
            max_height: default_max_height(),
            max_download_bytes: default_max_download_bytes(),
        }
    }
}

impl CacheConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
