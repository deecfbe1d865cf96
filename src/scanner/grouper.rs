//! Groups scanned files into movie and series entries.
//!
//! The grouping key is the parsed title, compared exactly. Titles appear in
//! the order they were first seen in the scan, and a movie's year comes from
//! its first file only.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use reelshelf_common::MediaKind;
use serde::Serialize;

use super::{file_name, ScannedFile};
use crate::images::PosterRef;

/// First standalone run of 3-5 digits, optionally with a short decimal part.
static EPISODE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(\d{3,5}(?:\.\d{1,2})?)(?:\D|$)").unwrap());

/// A movie title and every file that carries it.
#[derive(Debug, Clone, Serialize)]
pub struct MovieEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub files: Vec<PathBuf>,
    pub poster: Option<PosterRef>,
}

/// One episode file of a series.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeRecord {
    pub path: PathBuf,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub episode_label: Option<String>,
    /// Ordering key derived from the filename, see [`episode_sort_key`].
    pub sort_key: f64,
}

/// A series title and its episodes in display order.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesEntry {
    pub title: String,
    pub poster: Option<PosterRef>,
    pub episodes: Vec<EpisodeRecord>,
}

/// The grouped view of one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Library {
    pub movies: Vec<MovieEntry>,
    pub series: Vec<SeriesEntry>,
}

impl Library {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.series.is_empty()
    }
}

/// The raw episode-number token of a filename, e.g. `1015` or `12.5`.
pub fn episode_token(filename: &str) -> Option<&str> {
    EPISODE_TOKEN_RE
        .captures(filename)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Numeric sort key taken from the filename rather than the parsed episode,
/// so bare counters like `One Piece 1015` still order correctly. Files
/// without such a token get `0.0`.
pub fn episode_sort_key(filename: &str) -> f64 {
    episode_token(filename)
        .and_then(|t| t.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Group scanned files by title.
pub fn group<I>(entries: I) -> Library
where
    I: IntoIterator<Item = ScannedFile>,
{
    let mut library = Library::default();
    let mut movie_index: HashMap<String, usize> = HashMap::new();
    let mut series_index: HashMap<String, usize> = HashMap::new();

    for ScannedFile { path, descriptor } in entries {
        match descriptor.kind {
            MediaKind::Movie => match movie_index.get(&descriptor.title).copied() {
                Some(i) => library.movies[i].files.push(path),
                None => {
                    movie_index.insert(descriptor.title.clone(), library.movies.len());
                    library.movies.push(MovieEntry {
                        title: descriptor.title,
                        year: descriptor.year,
                        files: vec![path],
                        poster: None,
                    });
                }
            },
            MediaKind::Series => {
                let record = EpisodeRecord {
                    sort_key: episode_sort_key(&file_name(&path)),
                    season: descriptor.season(),
                    episode: descriptor.episode(),
                    episode_label: descriptor.episode_label().map(str::to_string),
                    path,
                };
                let i = *series_index
                    .entry(descriptor.title.clone())
                    .or_insert_with(|| {
                        library.series.push(SeriesEntry {
                            title: descriptor.title.clone(),
                            poster: None,
                            episodes: Vec::new(),
                        });
                        library.series.len() - 1
                    });
                library.series[i].episodes.push(record);
            }
        }
    }

    for series in &mut library.series {
        // stable: equal keys keep scan order
        series
            .episodes
            .sort_by(|a, b| a.sort_key.total_cmp(&b.sort_key));
    }

    library
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelshelf_parser::parse;

    fn scanned(path: &str) -> ScannedFile {
        let path = PathBuf::from(path);
        let descriptor = parse(&file_name(&path));
        ScannedFile { path, descriptor }
    }

    #[test]
    fn sort_key_takes_first_run_of_three_to_five_digits() {
        assert_eq!(episode_sort_key("One Piece 1015.mp4"), 1015.0);
        assert_eq!(episode_sort_key("Show 012.mkv"), 12.0);
        assert_eq!(episode_sort_key("Show.1015.5.mkv"), 1015.5);
        assert_eq!(episode_sort_key("Show.1015.720p.mkv"), 1015.0);
        assert_eq!(episode_sort_key("Show S01E05.mkv"), 0.0);
        assert_eq!(episode_sort_key("Show 123456.mkv"), 0.0);
        assert_eq!(episode_sort_key("Show.S01E05.1080p.mkv"), 1080.0);
    }

    #[test]
    fn episode_token_is_raw_text() {
        assert_eq!(episode_token("Naruto 220.5.mkv"), Some("220.5"));
        assert_eq!(episode_token("Naruto.mkv"), None);
    }

    #[test]
    fn movies_with_same_title_merge() {
        let library = group(vec![
            scanned("/m/Foo.2020.mp4"),
            scanned("/m/Foo.2020.Extended.mp4"),
        ]);
        assert_eq!(library.movies.len(), 1);
        assert_eq!(library.movies[0].title, "Foo");
        assert_eq!(library.movies[0].files.len(), 2);
        assert_eq!(library.movies[0].files[0], PathBuf::from("/m/Foo.2020.mp4"));
        assert!(library.series.is_empty());
    }

    #[test]
    fn bracketed_and_dotted_names_merge() {
        let library = group(vec![
            scanned("/lib/Heat (1995).mkv"),
            scanned("/lib/Heat.1995.mkv"),
        ]);
        assert_eq!(library.movies.len(), 1);
        assert_eq!(library.movies[0].title, "Heat");
        assert_eq!(library.movies[0].files.len(), 2);
    }

    #[test]
    fn movie_year_comes_from_first_occurrence() {
        let library = group(vec![scanned("/m/Dune.2021.mkv"), scanned("/m/Dune.1984.mkv")]);
        assert_eq!(library.movies.len(), 1);
        assert_eq!(library.movies[0].year.as_deref(), Some("2021"));
        assert_eq!(library.movies[0].files.len(), 2);
    }

    #[test]
    fn titles_keep_first_seen_order() {
        let library = group(vec![
            scanned("/m/Zulu.mkv"),
            scanned("/m/Alpha.mkv"),
            scanned("/m/Zulu.1964.mkv"),
        ]);
        let titles: Vec<&str> = library.movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Zulu", "Alpha"]);
    }

    #[test]
    fn series_episodes_group_and_sort_by_filename_key() {
        let library = group(vec![
            scanned("/s/Show.S01E03.mkv"),
            scanned("/s/Show.S01E01.mkv"),
            scanned("/s/Other.S02E01.mkv"),
        ]);
        assert_eq!(library.series.len(), 2);
        let show = &library.series[0];
        assert_eq!(show.title, "Show");
        // no numeric token: both key 0, scan order kept
        let labels: Vec<_> = show
            .episodes
            .iter()
            .map(|e| e.episode_label.as_deref().unwrap())
            .collect();
        assert_eq!(labels, vec!["S01E03", "S01E01"]);
        assert_eq!(show.episodes[0].season, Some(1));
        assert_eq!(show.episodes[0].episode, Some(3));
    }

    /// A file at `path` whose name parsed as `parsed_as`.
    fn scanned_as(path: &str, parsed_as: &str) -> ScannedFile {
        ScannedFile {
            path: PathBuf::from(path),
            descriptor: parse(parsed_as),
        }
    }

    #[test]
    fn episodes_without_token_sort_first_and_stay_stable() {
        let library = group(vec![
            scanned_as("/s/Anime S01E02 - 102.mkv", "Anime S01E02.mkv"),
            scanned_as("/s/Anime S01E01 - 101.mkv", "Anime S01E01.mkv"),
            scanned_as("/s/Anime S01E09 extra b.mkv", "Anime S01E09.mkv"),
            scanned_as("/s/Anime S01E08 extra a.mkv", "Anime S01E08.mkv"),
        ]);
        assert_eq!(library.series.len(), 1);
        let anime = &library.series[0];
        let names: Vec<String> = anime.episodes.iter().map(|e| file_name(&e.path)).collect();
        assert_eq!(
            names,
            vec![
                "Anime S01E09 extra b.mkv",
                "Anime S01E08 extra a.mkv",
                "Anime S01E01 - 101.mkv",
                "Anime S01E02 - 102.mkv",
            ]
        );
    }

    #[test]
    fn sort_key_ignores_parsed_episode_number() {
        let library = group(vec![
            scanned_as("/s/Show - 1020.mkv", "Show S01E01.mkv"),
            scanned_as("/s/Show - 1010.mkv", "Show S01E02.mkv"),
        ]);
        let episodes = &library.series[0].episodes;
        assert_eq!(episodes[0].episode, Some(2));
        assert_eq!(episodes[0].sort_key, 1010.0);
        assert_eq!(episodes[1].episode, Some(1));
    }

    #[test]
    fn empty_input_gives_empty_library() {
        assert!(group(Vec::new()).is_empty());
    }
}
