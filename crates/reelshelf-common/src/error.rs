//! Common error types used throughout reelshelf.
//!
//! Only whole-operation failures are represented here. Per-item problems
//! (one unreadable file, one broken poster) are logged and skipped by the
//! callers and never become an [`Error`].

use std::path::PathBuf;

/// Common error type for reelshelf.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The scan root does not exist or is not a directory.
    #[error("Scan root not found: {}", .0.display())]
    ScanRootMissing(PathBuf),

    /// The scan root exists but cannot be listed.
    #[error("Scan root unreadable: {}: {source}", path.display())]
    ScanRootUnreadable {
        /// The root that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Returns `true` for failures of the scan root itself, as opposed to
    /// configuration or generic I/O errors.
    pub fn is_scan_failure(&self) -> bool {
        matches!(
            self,
            Self::ScanRootMissing(_) | Self::ScanRootUnreadable { .. }
        )
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ScanRootMissing(PathBuf::from("/media/none"));
        assert_eq!(err.to_string(), "Scan root not found: /media/none");

        let err = Error::config("cache.max_width must be > 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: cache.max_width must be > 0"
        );
    }

    #[test]
    fn test_unreadable_keeps_source() {
        let err = Error::ScanRootUnreadable {
            path: PathBuf::from("/root/secret"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("Scan root unreadable: /root/secret"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_scan_failure() {
        assert!(Error::ScanRootMissing(PathBuf::from("x")).is_scan_failure());
        assert!(!Error::config("bad").is_scan_failure());
        assert!(!Error::from(std::io::Error::other("boom")).is_scan_failure());
    }
}
