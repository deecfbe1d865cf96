//! Path utilities for detecting media files by extension.
//!
//! The scanner only considers files whose extension is in the media set;
//! everything else under the library root (subtitles, artwork, NFO files)
//! is ignored.

use std::path::Path;

/// Default list of media file extensions.
const MEDIA_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov"];

/// Check if a path has one of the default media extensions.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use reelshelf_common::paths::is_media_file;
///
/// assert!(is_media_file(Path::new("movie.mkv")));
/// assert!(is_media_file(Path::new("/path/to/video.MP4")));
/// assert!(!is_media_file(Path::new("subtitle.srt")));
/// ```
pub fn is_media_file(path: &Path) -> bool {
    has_extension_in(path, MEDIA_EXTENSIONS)
}

/// Check if a path's extension (case-insensitive) is one of `extensions`.
///
/// Entries in `extensions` are expected in lowercase without the leading dot.
pub fn has_extension_in<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|e| e.as_ref() == ext)
        })
        .unwrap_or(false)
}

/// Get the default list of media file extensions.
///
/// # Examples
///
/// ```
/// use reelshelf_common::paths::media_extensions;
///
/// assert!(media_extensions().contains(&"mkv"));
/// ```
#[must_use]
pub fn media_extensions() -> &'static [&'static str] {
    MEDIA_EXTENSIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_media_file() {
        assert!(is_media_file(Path::new("movie.mkv")));
        assert!(is_media_file(Path::new("movie.mp4")));
        assert!(is_media_file(Path::new("movie.avi")));
        assert!(is_media_file(Path::new("movie.mov")));

        // Case insensitive
        assert!(is_media_file(Path::new("movie.MKV")));
        assert!(is_media_file(Path::new("movie.Mp4")));

        // With paths
        assert!(is_media_file(Path::new("/path/to/movie.mkv")));

        // Not in the media set
        assert!(!is_media_file(Path::new("movie.webm")));
        assert!(!is_media_file(Path::new("subtitle.srt")));
        assert!(!is_media_file(Path::new("poster.jpg")));
        assert!(!is_media_file(Path::new("no_extension")));
    }

    #[test]
    fn test_has_extension_in_custom_list() {
        let exts = vec!["webm".to_string(), "ts".to_string()];
        assert!(has_extension_in(Path::new("clip.WEBM"), &exts));
        assert!(has_extension_in(Path::new("a/b/c.ts"), &exts));
        assert!(!has_extension_in(Path::new("movie.mkv"), &exts));
    }

    #[test]
    fn test_edge_cases() {
        assert!(!is_media_file(Path::new("")));
        assert!(is_media_file(Path::new(".hidden.mkv")));
        assert!(is_media_file(Path::new("movie.1080p.mkv")));
        assert!(!is_media_file(Path::new("mkv")));
    }

    #[test]
    fn test_media_extensions() {
        let exts = media_extensions();
        assert_eq!(exts.len(), 4);
        assert!(exts.contains(&"mp4"));
        assert!(exts.contains(&"mov"));
    }
}
