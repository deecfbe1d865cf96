//! Name search over local media files.

use std::path::PathBuf;

use reelshelf_common::MediaKind;
use serde::Serialize;

use super::file_name;
use super::grouper::{episode_sort_key, episode_token};

/// A local file matching a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalMatch {
    pub name: String,
    pub path: PathBuf,
    /// Episode number token from the filename (series searches only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
}

/// Lowercase ASCII letters and digits only.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Files whose squashed stem contains the squashed `query`.
///
/// For series the episode token is extracted and matches are ordered by it
/// (stable, files without a token first). An empty query matches nothing.
pub fn find_local(files: &[PathBuf], query: &str, kind: MediaKind) -> Vec<LocalMatch> {
    let needle = squash(query);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<LocalMatch> = files
        .iter()
        .filter_map(|path| {
            let name = file_name(path);
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !squash(&stem).contains(&needle) {
                return None;
            }
            let episode = match kind {
                MediaKind::Series => episode_token(&name).map(str::to_string),
                MediaKind::Movie => None,
            };
            Some(LocalMatch {
                name,
                path: path.clone(),
                episode,
            })
        })
        .collect();

    if kind == MediaKind::Series {
        matches.sort_by(|a, b| episode_sort_key(&a.name).total_cmp(&episode_sort_key(&b.name)));
    }

    matches
}
