//! Attach poster artwork to a grouped library.

use reelshelf_common::MediaKind;
use tracing::{debug, warn};

use crate::images::{PosterCache, PosterRef};
use crate::metadata::PosterQuery;
use crate::scanner::Library;

/// Look up and cache the poster for one title.
///
/// Returns `None` when the provider has nothing for the title or the search
/// itself fails. Otherwise the provider's URL goes through the cache with
/// `query` as fallback information.
pub async fn poster_for(cache: &PosterCache, query: &PosterQuery) -> Option<PosterRef> {
    match cache.provider().search_poster(query).await {
        Ok(Some(url)) => Some(cache.resolve(&url, Some(query)).await),
        Ok(None) => {
            debug!(title = %query.title, kind = %query.kind, "No poster found");
            None
        }
        Err(e) => {
            warn!(title = %query.title, error = %e, "Poster search failed");
            None
        }
    }
}

/// Resolve a poster for every movie and series in `library`.
///
/// Movies are searched with their captured year, series by title alone.
/// Each title is handled independently. Returns how many titles got a poster.
pub async fn attach_posters(library: &mut Library, cache: &PosterCache) -> usize {
    let mut attached = 0;

    for movie in &mut library.movies {
        let query = PosterQuery::new(movie.title.clone(), MediaKind::Movie)
            .with_year(movie.year.clone());
        movie.poster = poster_for(cache, &query).await;
        attached += usize::from(movie.poster.is_some());
    }

    for series in &mut library.series {
        let query = PosterQuery::new(series.title.clone(), MediaKind::Series);
        series.poster = poster_for(cache, &query).await;
        attached += usize::from(series.poster.is_some());
    }

    debug!(
        attached,
        titles = library.movies.len() + library.series.len(),
        "Attached posters"
    );
    attached
}
