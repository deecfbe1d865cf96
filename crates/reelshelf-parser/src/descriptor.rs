//! The structured result of parsing one filename.

use reelshelf_common::MediaKind;

/// Season/episode pair captured from an explicit marker such as `S02E05`
/// or `2x05`.
///
/// Both numbers always come from the same match, so a descriptor either has
/// both or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeMarker {
    /// Season number.
    pub season: u32,
    /// Episode number within the season.
    pub episode: u32,
    /// Canonical zero-padded label, e.g. `S02E05`.
    #[cfg_attr(feature = "serde", serde(rename = "episode_label"))]
    pub label: String,
}

impl EpisodeMarker {
    /// Build a marker and its canonical `SxxEyy` label.
    pub fn new(season: u32, episode: u32) -> Self {
        Self {
            season,
            episode,
            label: format!("S{:02}E{:02}", season, episode),
        }
    }
}

/// Metadata derived from a single filename.
///
/// Produced by [`crate::parse`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaDescriptor {
    /// Original filename without its extension.
    pub raw_stem: String,
    /// Normalized, title-cased name. Never empty.
    pub title: String,
    /// Movie unless an explicit episode marker was found.
    pub kind: MediaKind,
    /// Four-digit release year, if one was found.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub year: Option<String>,
    /// Season/episode, present only for series.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub marker: Option<EpisodeMarker>,
}

impl MediaDescriptor {
    /// Season number, if an explicit marker was found.
    pub fn season(&self) -> Option<u32> {
        self.marker.as_ref().map(|m| m.season)
    }

    /// Episode number, if an explicit marker was found.
    pub fn episode(&self) -> Option<u32> {
        self.marker.as_ref().map(|m| m.episode)
    }

    /// Canonical `SxxEyy` label, if an explicit marker was found.
    pub fn episode_label(&self) -> Option<&str> {
        self.marker.as_ref().map(|m| m.label.as_str())
    }

    /// Year as a number, for providers that filter on it.
    pub fn year_number(&self) -> Option<u16> {
        self.year.as_deref().and_then(|y| y.parse().ok())
    }
}
