//! Media library scanner.
//!
//! Walks a library root, parses every media filename, and groups the results
//! into movie and series entries. A scan is recomputed on every call; nothing
//! is persisted.

pub mod grouper;
pub mod search;

use reelshelf_common::{paths::has_extension_in, Error, MediaKind, Result};
use reelshelf_parser::{MediaDescriptor, Parser};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibraryConfig;

pub use grouper::{episode_sort_key, group, EpisodeRecord, Library, MovieEntry, SeriesEntry};
pub use search::LocalMatch;

/// One media file found by a scan together with its parsed metadata.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub descriptor: MediaDescriptor,
}

/// Scanner for discovering media files under a library root.
#[derive(Debug, Clone)]
pub struct Scanner {
    parser: Parser,
    extensions: Vec<String>,
}

impl Scanner {
    /// Create a scanner accepting the given lowercase extensions.
    pub fn new(extensions: Vec<String>) -> Self {
        Self {
            parser: Parser::default(),
            extensions,
        }
    }

    pub fn from_config(config: &LibraryConfig) -> Self {
        Self::new(config.extensions.clone())
    }

    /// Use a custom parser instead of the default rule order.
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// List media files under `root` in lexicographic path order.
    ///
    /// Fails only when the root itself is missing or unreadable; unreadable
    /// entries below the root are logged and skipped.
    pub fn media_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        check_root(root)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(Error::ScanRootUnreadable {
                        path: root.to_path_buf(),
                        source: std::io::Error::from(e),
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if !has_extension_in(entry.path(), &self.extensions) {
                continue;
            }

            files.push(entry.into_path());
        }

        Ok(files)
    }

    /// Scan a directory and parse every media filename.
    pub fn scan(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        info!("Scanning directory: {:?}", root);

        let scanned: Vec<ScannedFile> = self
            .media_files(root)?
            .into_iter()
            .map(|path| {
                let descriptor = self.parser.parse(&file_name(&path));
                debug!(
                    path = %path.display(),
                    title = %descriptor.title,
                    kind = %descriptor.kind,
                    "Parsed media file"
                );
                ScannedFile { path, descriptor }
            })
            .collect();

        info!("Scan complete: {} media files under {:?}", scanned.len(), root);
        Ok(scanned)
    }

    /// Scan and group in one step.
    pub fn index(&self, root: &Path) -> Result<Library> {
        let library = group(self.scan(root)?);
        info!(
            "Grouped {} movies and {} series",
            library.movies.len(),
            library.series.len()
        );
        Ok(library)
    }

    /// Find local files whose name contains `name`, ignoring case and
    /// punctuation. Series matches are ordered by their episode number.
    pub fn find(&self, root: &Path, name: &str, kind: MediaKind) -> Result<Vec<LocalMatch>> {
        let files = self.media_files(root)?;
        Ok(search::find_local(&files, name, kind))
    }
}

/// The final path component as text, lossily converted when not UTF-8.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn check_root(root: &Path) -> Result<()> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(Error::ScanRootMissing(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::ScanRootMissing(root.to_path_buf()));
        }
        Err(e) => {
            return Err(Error::ScanRootUnreadable {
                path: root.to_path_buf(),
                source: e,
            });
        }
    }

    std::fs::read_dir(root).map_err(|e| Error::ScanRootUnreadable {
        path: root.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
