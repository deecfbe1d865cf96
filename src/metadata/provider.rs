//! Trait definition and query type for poster lookups.
//!
//! A [`MetadataProvider`] wraps one remote search API and answers a single
//! question: which artwork URL belongs to this title?

use async_trait::async_trait;
use reelshelf_common::MediaKind;
use reelshelf_parser::MediaDescriptor;
use serde::{Deserialize, Serialize};

/// What a provider is asked to find. Doubles as the fallback information the
/// poster cache uses to look up a replacement for a broken URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterQuery {
    pub title: String,
    pub kind: MediaKind,
    pub year: Option<String>,
    /// Region / country code, sent upper-cased.
    pub region: Option<String>,
}

impl PosterQuery {
    pub fn new(title: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            title: title.into(),
            kind,
            year: None,
            region: None,
        }
    }

    pub fn with_year(mut self, year: Option<String>) -> Self {
        self.year = year;
        self
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Region normalized for the wire, empty strings dropped.
    pub fn region_upper(&self) -> Option<String> {
        self.region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_uppercase)
    }
}

impl From<&MediaDescriptor> for PosterQuery {
    fn from(d: &MediaDescriptor) -> Self {
        Self::new(d.title.clone(), d.kind).with_year(d.year.clone())
    }
}

/// Async trait that all poster search backends implement.
///
/// Providers must tolerate being asked again for a title whose previous URL
/// turned out to be broken; they may return the same URL again.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider is configured and can serve requests.
    fn is_available(&self) -> bool;

    /// Search for the artwork URL of `query`.
    ///
    /// `Ok(None)` means the search ran but found nothing usable.
    async fn search_poster(&self, query: &PosterQuery) -> anyhow::Result<Option<String>>;
}
