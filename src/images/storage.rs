//! Filesystem-level poster storage keyed by source URL.
//!
//! Each poster lives at `{dir}/{key}.jpg` where `key` is derived from the
//! URL it was downloaded from. Files are never overwritten once present.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use sha2::{Digest, Sha256};
use tracing::debug;

const EXTENSION: &str = "jpg";

/// Compute the cache key for a source URL.
///
/// Returns the first 32 hex characters of the SHA-256 digest of the URL.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

/// Filesystem manager for cached posters.
#[derive(Debug, Clone)]
pub struct PosterStorage {
    dir: PathBuf,
    max_width: u32,
    max_height: u32,
}

impl PosterStorage {
    /// Create storage rooted at `dir`; stored images fit within
    /// `max_width` x `max_height`.
    pub fn new(dir: PathBuf, max_width: u32, max_height: u32) -> Self {
        Self {
            dir,
            max_width,
            max_height,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the entry for `key` lives, whether or not it exists.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{EXTENSION}"))
    }

    /// The stored file for `key`, if present.
    pub fn lookup(&self, key: &str) -> Option<PathBuf> {
        let path = self.path_for(key);
        path.is_file().then_some(path)
    }

    /// Decode `data`, shrink it to the bounding box (aspect ratio kept,
    /// never enlarged), encode as JPEG and store it under `key`.
    ///
    /// The file is written to a temporary name and moved into place without
    /// clobbering; if an entry for `key` already exists it is kept as is.
    pub fn store(&self, key: &str, data: &[u8]) -> Result<PathBuf> {
        let img = image::load_from_memory(data).context("Failed to decode image data")?;

        let img = if img.width() > self.max_width || img.height() > self.max_height {
            img.thumbnail(self.max_width, self.max_height)
        } else {
            img
        };

        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img.to_rgb8())
            .write_to(&mut buf, ImageFormat::Jpeg)
            .context("Failed to encode poster as JPEG")?;

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory: {}", self.dir.display()))?;

        let path = self.path_for(key);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(buf.get_ref())
            .context("Failed to write poster data")?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => debug!(key, path = %path.display(), "Stored poster"),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(key, "Poster already cached, keeping existing file");
            }
            Err(e) => {
                return Err(e.error)
                    .with_context(|| format!("Failed to write poster file: {}", path.display()));
            }
        }

        Ok(path)
    }

    /// Keys of every stored poster, sorted.
    pub fn entries(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for path in self.entry_paths()? {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Delete every stored poster. Returns how many were removed.
    pub fn clear(&self) -> Result<usize> {
        let paths = self.entry_paths()?;
        for path in &paths {
            std::fs::remove_file(path)
                .with_context(|| format!("Failed to delete poster file: {}", path.display()))?;
        }
        Ok(paths.len())
    }

    fn entry_paths(&self) -> Result<Vec<PathBuf>> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read cache directory: {}", self.dir.display())
                })
            }
        };

        let mut paths = Vec::new();
        for entry in read_dir {
            let path = entry?.path();
            let is_entry = path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(EXTENSION);
            if is_entry {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}
