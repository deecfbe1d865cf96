//! OMDb (Open Movie Database) poster provider.
//!
//! OMDb answers a title lookup with a single record whose `Poster` field is
//! already an absolute URL, or `"N/A"` when there is none.

use anyhow::Context;
use async_trait::async_trait;
use reelshelf_common::MediaKind;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::metadata::provider::{MetadataProvider, PosterQuery};

const OMDB_BASE_URL: &str = "http://www.omdbapi.com/";

#[derive(Debug, Deserialize)]
struct OmdbTitleResponse {
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

/// OMDb poster provider.
pub struct OmdbProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OmdbProvider {
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build OMDb HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OMDB_BASE_URL.to_string()),
        })
    }

    fn params(&self, query: &PosterQuery) -> Vec<(&'static str, String)> {
        let kind = match query.kind {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        };
        let mut params = vec![("t", query.title.clone()), ("type", kind.to_string())];
        if let Some(ref year) = query.year {
            params.push(("y", year.clone()));
        }
        params
    }
}

/// `"N/A"` and blank values mean no poster.
fn usable_poster(poster: Option<String>) -> Option<String> {
    poster.filter(|p| {
        let p = p.trim();
        !p.is_empty() && !p.eq_ignore_ascii_case("n/a")
    })
}

#[async_trait]
impl MetadataProvider for OmdbProvider {
    fn name(&self) -> &'static str {
        "omdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_poster(&self, query: &PosterQuery) -> anyhow::Result<Option<String>> {
        if !self.is_available() {
            debug!("OMDb has no API key, skipping lookup");
            return Ok(None);
        }

        let mut params = self.params(query);
        debug!(url = %self.base_url, params = ?params, "OMDb title lookup");
        params.push(("apikey", self.api_key.clone()));

        let body: OmdbTitleResponse = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .with_context(|| format!("OMDb request failed: {}", self.base_url))?
            .error_for_status()
            .context("OMDb request returned error")?
            .json()
            .await
            .context("failed to parse OMDb response")?;

        let poster = usable_poster(body.poster);
        if poster.is_none() {
            info!(title = %query.title, "Poster not found");
        }
        Ok(poster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_poster_is_none() {
        assert_eq!(usable_poster(Some("N/A".into())), None);
        assert_eq!(usable_poster(Some("  ".into())), None);
        assert_eq!(usable_poster(None), None);
        assert_eq!(
            usable_poster(Some("https://m.media-amazon.com/x.jpg".into())).as_deref(),
            Some("https://m.media-amazon.com/x.jpg")
        );
    }

    #[test]
    fn params_map_kind_and_year() {
        let provider = OmdbProvider::new(&ProviderConfig::default()).unwrap();
        let q = PosterQuery::new("Dark", MediaKind::Series).with_year(Some("2017".into()));
        let params = provider.params(&q);
        assert_eq!(
            params,
            vec![
                ("t", "Dark".to_string()),
                ("type", "series".to_string()),
                ("y", "2017".to_string()),
            ]
        );
    }
}
