//! Local poster cache.
//!
//! Remote artwork is downloaded once, shrunk to a small poster, and stored
//! under a key derived from its source URL. Entries are write-once: nothing
//! here refreshes or replaces an existing file.

mod cache;
mod storage;

pub use cache::{PosterCache, PosterRef};
pub use storage::{cache_key, PosterStorage};
