//! Concrete metadata provider implementations.
//!
//! Each submodule wraps a single external API and implements the
//! [`MetadataProvider`](super::MetadataProvider) trait.

pub mod omdb;
pub mod tmdb;

use std::sync::Arc;

use async_trait::async_trait;

pub use omdb::OmdbProvider;
pub use tmdb::TmdbProvider;

use super::provider::{MetadataProvider, PosterQuery};
use crate::config::{ProviderConfig, ProviderKind};

/// Provider that never finds anything. Used when lookups are switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProvider;

#[async_trait]
impl MetadataProvider for DisabledProvider {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn search_poster(&self, _query: &PosterQuery) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

/// Build the provider selected in the configuration.
pub fn build_provider(config: &ProviderConfig) -> anyhow::Result<Arc<dyn MetadataProvider>> {
    Ok(match config.kind {
        ProviderKind::Tmdb => Arc::new(TmdbProvider::new(config)?),
        ProviderKind::Omdb => Arc::new(OmdbProvider::new(config)?),
        ProviderKind::None => Arc::new(DisabledProvider),
    })
}
