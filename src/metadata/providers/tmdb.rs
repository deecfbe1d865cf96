//! TMDB (The Movie Database) poster provider.
//!
//! Implements [`MetadataProvider`] by querying the TMDB v3 search API.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Configurable request timeout.
//! - Exact-title (and year) matching with a first-result fallback.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reelshelf_common::MediaKind;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::metadata::provider::{MetadataProvider, PosterQuery};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const MAX_RETRIES: u32 = 3;
const REQUESTS_PER_SECOND: u32 = 4;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbSearchResult>,
}

/// Movie results carry `title`/`release_date`, TV results
/// `name`/`first_air_date`.
#[derive(Debug, Deserialize)]
struct TmdbSearchResult {
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
}

impl TmdbSearchResult {
    fn display_title(&self, kind: MediaKind) -> &str {
        let title = match kind {
            MediaKind::Movie => self.title.as_deref().or(self.name.as_deref()),
            MediaKind::Series => self.name.as_deref().or(self.title.as_deref()),
        };
        title.unwrap_or_default()
    }

    fn year(&self) -> &str {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|d| d.get(..4))
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// TMDB poster provider.
///
/// # Examples
///
/// ```no_run
/// use reelshelf::config::ProviderConfig;
/// use reelshelf::metadata::providers::TmdbProvider;
///
/// let config = ProviderConfig {
///     api_key: "your-api-key".into(),
///     ..Default::default()
/// };
/// let provider = TmdbProvider::new(&config).unwrap();
/// ```
pub struct TmdbProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    language: Option<String>,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbProvider {
    /// Create a new TMDB provider from its configuration section.
    pub fn new(config: &ProviderConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build TMDB HTTP client")?;

        let quota = Quota::per_second(NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = RateLimiter::direct(quota);

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| TMDB_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            rate_limiter,
        })
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str, params: &[(&str, String)]) -> anyhow::Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(url)
                .query(params)
                .send()
                .await
                .with_context(|| format!("TMDB request failed: {url}"))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            let resp = resp
                .error_for_status()
                .with_context(|| format!("TMDB request returned error: {url}"))?;

            return Ok(resp);
        }
    }

    /// Query parameters for a search, without the API key.
    fn search_params(&self, query: &PosterQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", query.title.clone())];
        if let Some(ref year) = query.year {
            let key = match query.kind {
                MediaKind::Movie => "year",
                MediaKind::Series => "first_air_date_year",
            };
            params.push((key, year.clone()));
        }
        if let Some(region) = query.region_upper() {
            params.push(("region", region));
        }
        if let Some(ref language) = self.language {
            params.push(("language", language.clone()));
        }
        params
    }

    /// Convert a TMDB image path fragment to a full URL.
    fn image_url(&self, path: &str) -> String {
        format!("{}{}", self.image_base_url, path)
    }
}

/// Pick the poster path: exact case-insensitive title match (and equal year
/// when one is known), else whatever the first result has.
fn select_poster<'a>(
    results: &'a [TmdbSearchResult],
    query: &PosterQuery,
) -> Option<&'a str> {
    let wanted = query.title.to_lowercase();
    let exact = results.iter().find(|r| {
        r.poster_path.is_some()
            && r.display_title(query.kind).to_lowercase() == wanted
            && query.year.as_deref().map_or(true, |y| r.year() == y)
    });

    exact
        .or_else(|| results.first())
        .and_then(|r| r.poster_path.as_deref())
}

fn search_path(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "movie",
        MediaKind::Series => "tv",
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    fn name(&self) -> &'static str {
        "tmdb"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_poster(&self, query: &PosterQuery) -> anyhow::Result<Option<String>> {
        if !self.is_available() {
            debug!("TMDB has no API key, skipping lookup");
            return Ok(None);
        }

        let url = format!("{}/search/{}", self.base_url, search_path(query.kind));
        let mut params = self.search_params(query);
        debug!(url = %url, params = ?params, "TMDB search");
        params.push(("api_key", self.api_key.clone()));

        let body: TmdbSearchResponse = self
            .get(&url, &params)
            .await?
            .json()
            .await
            .context("failed to parse TMDB search response")?;

        match select_poster(&body.results, query) {
            Some(path) => Ok(Some(self.image_url(path))),
            None => {
                info!(title = %query.title, "Poster not found");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, date: &str, poster: Option<&str>) -> TmdbSearchResult {
        TmdbSearchResult {
            title: Some(title.to_string()),
            name: None,
            release_date: Some(date.to_string()),
            first_air_date: None,
            poster_path: poster.map(str::to_string),
        }
    }

    fn provider() -> TmdbProvider {
        TmdbProvider::new(&ProviderConfig {
            api_key: "k".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn exact_title_and_year_wins() {
        let results = vec![
            result("Dune Part Two", "2024-03-01", Some("/a.jpg")),
            result("Dune", "1984-12-14", Some("/b.jpg")),
            result("Dune", "2021-09-15", Some("/c.jpg")),
        ];
        let q = PosterQuery::new("dune", MediaKind::Movie).with_year(Some("2021".into()));
        assert_eq!(select_poster(&results, &q), Some("/c.jpg"));

        let q = PosterQuery::new("Dune", MediaKind::Movie);
        assert_eq!(select_poster(&results, &q), Some("/b.jpg"));
    }

    #[test]
    fn falls_back_to_first_result() {
        let results = vec![
            result("Something Else", "2001-01-01", Some("/first.jpg")),
            result("Other", "2002-01-01", Some("/second.jpg")),
        ];
        let q = PosterQuery::new("Nope", MediaKind::Movie);
        assert_eq!(select_poster(&results, &q), Some("/first.jpg"));
    }

    #[test]
    fn first_result_without_poster_gives_none() {
        let results = vec![result("Other", "2002-01-01", None)];
        let q = PosterQuery::new("Nope", MediaKind::Movie);
        assert_eq!(select_poster(&results, &q), None);
        assert_eq!(select_poster(&[], &q), None);
    }

    #[test]
    fn tv_results_use_name_and_air_date() {
        let results = vec![TmdbSearchResult {
            title: None,
            name: Some("Dark".into()),
            release_date: None,
            first_air_date: Some("2017-12-01".into()),
            poster_path: Some("/dark.jpg".into()),
        }];
        let q = PosterQuery::new("Dark", MediaKind::Series).with_year(Some("2017".into()));
        assert_eq!(select_poster(&results, &q), Some("/dark.jpg"));
        assert_eq!(results[0].year(), "2017");
    }

    #[test]
    fn search_params_follow_kind() {
        let p = provider();
        let q = PosterQuery::new("Dark", MediaKind::Series)
            .with_year(Some("2017".into()))
            .with_region(Some("de".into()));
        let params = p.search_params(&q);
        assert!(params.contains(&("first_air_date_year", "2017".to_string())));
        assert!(params.contains(&("region", "DE".to_string())));

        let q = PosterQuery::new("Heat", MediaKind::Movie).with_year(Some("1995".into()));
        assert!(p.search_params(&q).contains(&("year", "1995".to_string())));
    }

    #[test]
    fn image_url_construction() {
        assert_eq!(
            provider().image_url("/abc123.jpg"),
            "https://image.tmdb.org/t/p/w500/abc123.jpg"
        );
    }

    #[test]
    fn provider_is_available() {
        assert!(provider().is_available());
        let empty = TmdbProvider::new(&ProviderConfig::default()).unwrap();
        assert!(!empty.is_available());
    }
}
