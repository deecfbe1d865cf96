//! Core type definitions shared between crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a title is a single film or an episodic series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A single movie.
    #[default]
    Movie,
    /// A TV series (show).
    Series,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Series => write!(f, "series"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(Self::Movie),
            "series" | "tv" | "show" | "tvshow" => Ok(Self::Series),
            _ => Err(format!("Unknown media kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Movie.to_string(), "movie");
        assert_eq!(MediaKind::Series.to_string(), "series");
    }

    #[test]
    fn test_media_kind_from_str() {
        assert_eq!("Movie".parse::<MediaKind>(), Ok(MediaKind::Movie));
        assert_eq!("tv".parse::<MediaKind>(), Ok(MediaKind::Series));
        assert_eq!(" series ".parse::<MediaKind>(), Ok(MediaKind::Series));
        assert!("anime".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_media_kind_serde() {
        let json = serde_json::to_string(&MediaKind::Series).unwrap();
        assert_eq!(json, "\"series\"");
        let kind: MediaKind = serde_json::from_str("\"movie\"").unwrap();
        assert_eq!(kind, MediaKind::Movie);
    }
}
