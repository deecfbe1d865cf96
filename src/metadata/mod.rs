//! Poster lookup against external metadata services.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait definition and the query type.
//! - [`providers`] -- Concrete provider implementations (TMDB, OMDb).

pub mod provider;
pub mod providers;

pub use provider::{MetadataProvider, PosterQuery};
pub use providers::{build_provider, DisabledProvider, OmdbProvider, TmdbProvider};
