//! Ordered extraction rules applied to a normalized filename.
//!
//! Each rule works on a [`WorkingName`]: the lowercased, separator-free
//! string plus whatever has been extracted so far. Rules remove what they
//! consume from the string so later rules never see it again. Order matters:
//! [`Rule::Year`] and [`Rule::EpisodeMarker`] must run before
//! [`Rule::JunkNumber`], otherwise a year would be discarded as a bare number.
//!
//! The patterns live in plain tables so a single rule can be exercised on
//! its own:
//!
//! ```
//! use reelshelf_parser::rules::{Rule, WorkingName};
//!
//! let mut work = WorkingName::new("blade runner 1982 1080p");
//! Rule::Year.apply(&mut work);
//! assert_eq!(work.year.as_deref(), Some("1982"));
//! assert!(!work.text.contains("1982"));
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::descriptor::EpisodeMarker;

/// Year token: 1900-1999 or 2000-2029.
pub const YEAR_PATTERN: &str = r"\b(19\d{2}|20[0-2]\d)\b";

/// Explicit episode markers, tried in order. Group 1 is the season,
/// group 2 the episode.
pub const EPISODE_PATTERNS: &[&str] = &[r"\bs(\d{1,2})e(\d{1,2})\b", r"\b(\d{1,2})x(\d{1,2})\b"];

/// Standalone 3-5 digit numbers.
///
/// Known ambiguity: episode counters such as the `1015` in
/// `One Piece 1015` look exactly like resolution or bitrate tags, so they
/// are discarded rather than captured as episode numbers.
pub const JUNK_NUMBER_PATTERN: &str = r"\b\d{3,5}\b";

/// Release-site names, source/quality tags, codecs, container hints and
/// edition tags. Matched case-insensitively as whole words against the
/// separator-normalized string (so `WEB-DL` arrives as `web dl`).
pub const JUNK_TOKEN_PATTERNS: &[&str] = &[
    r"\b(?:mycima|wecima|weciima)(?: (?:show|tube|autos|ink|world))?\b",
    r"\b(?:web ?dl|webrip|web|nf|hdtv|bluray|hdrip|dvdrip|brrip)\b",
    r"\b(?:2160p|1080p|720p|480p|4k)\b",
    r"\b(?:x264|x265|h264|h265|hevc|aac)\b",
    r"\b(?:mp4|mkv|avi|mov)\b",
    r"\b(?:extended|unrated|remastered|proper|repack)\b",
    r"\b(?:ova|ar|sp)\b",
];

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| compile(YEAR_PATTERN));

static EPISODE_RES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| EPISODE_PATTERNS.iter().map(|p| compile(p)).collect());

static JUNK_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| compile(JUNK_NUMBER_PATTERN));

static JUNK_TOKEN_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    JUNK_TOKEN_PATTERNS
        .iter()
        .map(|p| compile(&format!("(?i){}", p)))
        .collect()
});

/// The patterns above are constants and covered by tests.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// Mutable state threaded through the rules.
#[derive(Debug, Clone, Default)]
pub struct WorkingName {
    /// What is left of the name after earlier rules ran.
    pub text: String,
    /// Year captured by [`Rule::Year`].
    pub year: Option<String>,
    /// Marker captured by [`Rule::EpisodeMarker`].
    pub marker: Option<EpisodeMarker>,
}

impl WorkingName {
    /// Start from an already-normalized string.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Replace a byte range with a single space so neighbouring words stay
    /// separated.
    fn cut(&mut self, start: usize, end: usize) {
        self.text.replace_range(start..end, " ");
    }
}

/// A single extraction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Capture and remove the first year token.
    Year,
    /// Capture and remove the first explicit `SxxEyy` / `NxM` marker.
    EpisodeMarker,
    /// Remove standalone 3-5 digit numbers, only when no explicit marker
    /// was found.
    JunkNumber,
    /// Remove every known junk token.
    JunkTokens,
}

/// The default rule order.
pub const DEFAULT_RULES: &[Rule] = &[
    Rule::Year,
    Rule::EpisodeMarker,
    Rule::JunkNumber,
    Rule::JunkTokens,
];

impl Rule {
    /// Run this rule against `work`.
    pub fn apply(&self, work: &mut WorkingName) {
        match self {
            Rule::Year => {
                if work.year.is_some() {
                    return;
                }
                let Some(year) = YEAR_RE
                    .captures(&work.text)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
                else {
                    return;
                };
                // every standalone repeat of the captured year goes too
                work.text = YEAR_RE
                    .replace_all(&work.text, |caps: &regex::Captures<'_>| {
                        if caps[1] == year {
                            " ".to_string()
                        } else {
                            caps[0].to_string()
                        }
                    })
                    .into_owned();
                work.year = Some(year);
            }
            Rule::EpisodeMarker => {
                if work.marker.is_some() {
                    return;
                }
                for re in EPISODE_RES.iter() {
                    let Some(caps) = re.captures(&work.text) else {
                        continue;
                    };
                    let (start, end) = match caps.get(0) {
                        Some(whole) => (whole.start(), whole.end()),
                        None => continue,
                    };
                    let season = caps[1].parse::<u32>();
                    let episode = caps[2].parse::<u32>();
                    if let (Ok(season), Ok(episode)) = (season, episode) {
                        work.marker = Some(EpisodeMarker::new(season, episode));
                        work.cut(start, end);
                        return;
                    }
                }
            }
            Rule::JunkNumber => {
                if work.marker.is_none() {
                    work.text = JUNK_NUMBER_RE.replace_all(&work.text, " ").into_owned();
                }
            }
            Rule::JunkTokens => {
                for re in JUNK_TOKEN_RES.iter() {
                    work.text = re.replace_all(&work.text, " ").into_owned();
                }
            }
        }
    }
}
