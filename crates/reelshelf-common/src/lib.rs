//! Reelshelf-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across reelshelf:
//!
//! - **Core Types**: the [`MediaKind`] enum shared by the parser, the library
//!   grouper, and the metadata providers
//! - **Path Utilities**: functions to detect media files by extension
//! - **Error Handling**: the error type surfaced at component boundaries
//!
//! # Examples
//!
//! ```
//! use reelshelf_common::{Error, MediaKind, Result};
//! use reelshelf_common::paths::is_media_file;
//! use std::path::{Path, PathBuf};
//!
//! assert!(is_media_file(Path::new("movie.mkv")));
//! assert_eq!(MediaKind::Series.to_string(), "series");
//!
//! fn example() -> Result<()> {
//!     Err(Error::ScanRootMissing(PathBuf::from("/nowhere")))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
