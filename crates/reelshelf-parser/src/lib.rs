//! # reelshelf-parser
//!
//! Best-effort parser for loosely-named video files.
//!
//! Turns names like `The.Matrix.1999.1080p.BluRay.mp4` or
//! `Show_Name_S02E05_WEB-DL.mkv` into a [`MediaDescriptor`] holding a clean
//! title, a movie/series kind, the release year and the season/episode.
//! Parsing never fails: when no structure is found the descriptor degrades
//! to a plain title with kind [`MediaKind::Movie`].
//!
//! ## Quick Start
//!
//! ```
//! use reelshelf_parser::{parse, MediaKind};
//!
//! let movie = parse("The.Matrix.1999.1080p.BluRay.mp4");
//! assert_eq!(movie.title, "The Matrix");
//! assert_eq!(movie.kind, MediaKind::Movie);
//! assert_eq!(movie.year.as_deref(), Some("1999"));
//!
//! let episode = parse("Show_Name_S02E05_WEB-DL.mkv");
//! assert_eq!(episode.title, "Show Name");
//! assert_eq!(episode.episode_label(), Some("S02E05"));
//! ```
//!
//! ## Custom rule order
//!
//! ```
//! use reelshelf_parser::Parser;
//! use reelshelf_parser::rules::Rule;
//!
//! // Keep bare numbers in the title.
//! let parser = Parser::new(vec![Rule::Year, Rule::EpisodeMarker, Rule::JunkTokens]);
//! assert_eq!(parser.parse("Apollo 13 1995.mkv").title, "Apollo 13");
//! ```

pub mod descriptor;
pub mod rules;

use std::sync::LazyLock;

use regex::Regex;

pub use descriptor::{EpisodeMarker, MediaDescriptor};
pub use reelshelf_common::MediaKind;
use rules::{Rule, WorkingName, DEFAULT_RULES};

/// Title used when a filename has no usable characters at all.
pub const UNTITLED: &str = "Untitled";

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\.[A-Za-z][A-Za-z0-9]{1,4}$").unwrap());

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_\-.]+").unwrap());

static EMPTY_BRACKETS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(\[{]\s*[)\]}]").unwrap());

/// Parse a filename with the default rule order.
///
/// # Examples
///
/// ```
/// use reelshelf_parser::parse;
///
/// let result = parse("One Piece 1015.mp4");
/// assert_eq!(result.title, "One Piece");
/// assert_eq!(result.episode(), None);
/// ```
pub fn parse(filename: &str) -> MediaDescriptor {
    Parser::default().parse(filename)
}

/// A filename parser driven by an ordered list of [`Rule`]s.
#[derive(Debug, Clone)]
pub struct Parser {
    rules: Vec<Rule>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl Parser {
    /// Create a parser that applies `rules` in order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The rules this parser applies, in order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Parse a filename (not a path) into a [`MediaDescriptor`].
    pub fn parse(&self, filename: &str) -> MediaDescriptor {
        let raw_stem = strip_extension(filename).to_string();
        let normalized = normalize(&raw_stem);

        let mut work = WorkingName::new(normalized.clone());
        for rule in &self.rules {
            rule.apply(&mut work);
        }

        let mut title = title_case(&drop_empty_brackets(&work.text));
        if title.is_empty() {
            title = title_case(&normalized);
        }
        if title.is_empty() {
            title = match raw_stem.trim() {
                "" => UNTITLED.to_string(),
                stem => stem.to_string(),
            };
        }

        let kind = if work.marker.is_some() {
            MediaKind::Series
        } else {
            MediaKind::Movie
        };

        MediaDescriptor {
            raw_stem,
            title,
            kind,
            year: work.year,
            marker: work.marker,
        }
    }
}

/// Drop a trailing extension such as `.mkv`.
///
/// Only short alphanumeric suffixes starting with a letter count, so
/// `The.Matrix.1999` and `Show.S01E01` keep their last component.
fn strip_extension(filename: &str) -> &str {
    EXTENSION_RE
        .captures(filename)
        .and_then(|c| c.get(1))
        .map_or(filename, |m| m.as_str())
}

/// Separators become spaces, everything is lowercased.
fn normalize(stem: &str) -> String {
    SEPARATOR_RE.replace_all(stem, " ").to_lowercase()
}

/// Remove bracket pairs left empty once the rules cut their contents,
/// e.g. the `( )` of `heat (1995)`. Nested pairs collapse from the inside out.
fn drop_empty_brackets(text: &str) -> String {
    let mut text = text.to_string();
    while EMPTY_BRACKETS_RE.is_match(&text) {
        text = EMPTY_BRACKETS_RE.replace_all(&text, " ").into_owned();
    }
    text
}

/// Collapse whitespace and capitalize the first letter of every word.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first alphanumeric character when it is a letter, skipping
/// leading punctuation such as `[` or `(`. `1080p` stays as is.
fn capitalize(word: &str) -> String {
    match word.char_indices().find(|(_, c)| c.is_alphanumeric()) {
        Some((i, c)) if c.is_alphabetic() => {
            let mut out = String::with_capacity(word.len());
            out.push_str(&word[..i]);
            out.extend(c.to_uppercase());
            out.push_str(&word[i + c.len_utf8()..]);
            out
        }
        _ => word.to_string(),
    }
}
