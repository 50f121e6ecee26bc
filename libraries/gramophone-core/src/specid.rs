//! Opaque entity identifiers
//!
//! Clients address every entity through a short token pairing an entity
//! kind with its numeric primary key, e.g. `al-12` or `tr-7`. The numeric key
//! stays the source of truth; tokens are derived on demand and never stored
//! as primary keys.
//!
//! The token format is a compatibility surface: tokens handed out to clients
//! must keep decoding across releases.
//!
//! ```rust
//! use gramophone_core::specid::{SpecId, SpecKind};
//!
//! let id = SpecId::new(SpecKind::Album, 12);
//! assert_eq!(id.to_string(), "al-12");
//! assert_eq!("al-12".parse::<SpecId>().unwrap(), id);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: char = '-';

/// Reasons a token was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedIdentifier {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier {0:?} has no kind separator")]
    MissingSeparator(String),

    #[error("identifier {0:?} has an unknown kind prefix")]
    UnknownKind(String),

    #[error("identifier {0:?} has an invalid numeric part")]
    InvalidValue(String),
}

/// Entity kinds addressable by a [`SpecId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpecKind {
    Artist,
    Album,
    Track,
    Playlist,
    Podcast,
    PodcastEpisode,
    InternetRadioStation,
}

impl SpecKind {
    /// Every supported kind
    pub const ALL: [SpecKind; 7] = [
        SpecKind::Artist,
        SpecKind::Album,
        SpecKind::Track,
        SpecKind::Playlist,
        SpecKind::Podcast,
        SpecKind::PodcastEpisode,
        SpecKind::InternetRadioStation,
    ];

    /// Token prefix
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Artist => "ar",
            Self::Album => "al",
            Self::Track => "tr",
            Self::Playlist => "pl",
            Self::Podcast => "pd",
            Self::PodcastEpisode => "pe",
            Self::InternetRadioStation => "ir",
        }
    }

    /// Look up a kind by its token prefix
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }

    /// Stable, human readable name (used when persisting a kind on its own)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Album => "album",
            Self::Track => "track",
            Self::Playlist => "playlist",
            Self::Podcast => "podcast",
            Self::PodcastEpisode => "podcast_episode",
            Self::InternetRadioStation => "internet_radio_station",
        }
    }

    /// Parse a name produced by [`SpecKind::as_str`]
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity kind paired with its numeric primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpecId {
    pub kind: SpecKind,
    pub value: i64,
}

impl SpecId {
    #[must_use]
    pub const fn new(kind: SpecKind, value: i64) -> Self {
        Self { kind, value }
    }

    /// Encode into the wire token
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a wire token
    ///
    /// Only tokens that [`SpecId::encode`] could have produced are accepted:
    /// a known prefix, a single separator and a canonical non-negative
    /// decimal (no sign, no whitespace, no leading zeros).
    pub fn decode(token: &str) -> Result<Self, MalformedIdentifier> {
        if token.is_empty() {
            return Err(MalformedIdentifier::Empty);
        }

        let (prefix, digits) = token
            .split_once(SEPARATOR)
            .ok_or_else(|| MalformedIdentifier::MissingSeparator(token.to_owned()))?;

        let kind = SpecKind::from_prefix(prefix)
            .ok_or_else(|| MalformedIdentifier::UnknownKind(token.to_owned()))?;

        let value = parse_canonical(digits)
            .ok_or_else(|| MalformedIdentifier::InvalidValue(token.to_owned()))?;

        Ok(Self { kind, value })
    }
}

fn parse_canonical(digits: &str) -> Option<i64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse::<i64>().ok()
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind.prefix(), SEPARATOR, self.value)
    }
}

impl FromStr for SpecId {
    type Err = MalformedIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for SpecId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpecId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::decode(&token).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encodes_with_kind_prefix() {
        assert_eq!(SpecId::new(SpecKind::Artist, 1).encode(), "ar-1");
        assert_eq!(SpecId::new(SpecKind::Album, 23).encode(), "al-23");
        assert_eq!(SpecId::new(SpecKind::Track, 0).encode(), "tr-0");
        assert_eq!(SpecId::new(SpecKind::Podcast, 4).encode(), "pd-4");
        assert_eq!(SpecId::new(SpecKind::PodcastEpisode, 5).encode(), "pe-5");
        assert_eq!(
            SpecId::new(SpecKind::InternetRadioStation, 6).encode(),
            "ir-6"
        );
    }

    #[test]
    fn decodes_known_tokens() {
        assert_eq!(
            SpecId::decode("tr-42").unwrap(),
            SpecId::new(SpecKind::Track, 42)
        );
        assert_eq!(
            SpecId::decode("ir-9223372036854775807").unwrap(),
            SpecId::new(SpecKind::InternetRadioStation, i64::MAX)
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(SpecId::decode(""), Err(MalformedIdentifier::Empty));
        assert!(matches!(
            SpecId::decode("42"),
            Err(MalformedIdentifier::MissingSeparator(_))
        ));
        assert!(matches!(
            SpecId::decode("xx-1"),
            Err(MalformedIdentifier::UnknownKind(_))
        ));
        for token in [
            "al-", "al--1", "al-+1", "al-01", "al- 1", "al-1 ", "al-1-2", "al-1.0",
            "al-9223372036854775808", "al-١",
        ] {
            assert!(
                matches!(SpecId::decode(token), Err(MalformedIdentifier::InvalidValue(_))),
                "{token:?} should be rejected"
            );
        }
        assert!(SpecId::decode("AL-1").is_err());
        assert!(SpecId::decode("-1").is_err());
    }

    #[test]
    fn serde_uses_token_string() {
        let id = SpecId::new(SpecKind::Album, 3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"al-3\"");
        let back: SpecId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<SpecId>("\"al-x\"").is_err());
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in SpecKind::ALL {
            assert_eq!(SpecKind::from_name(kind.as_str()), Some(kind));
            assert_eq!(SpecKind::from_prefix(kind.prefix()), Some(kind));
        }
    }

    fn any_kind() -> impl Strategy<Value = SpecKind> {
        prop::sample::select(SpecKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn round_trips_every_kind(kind in any_kind(), value in 0..=i64::MAX) {
            let id = SpecId::new(kind, value);
            prop_assert_eq!(SpecId::decode(&id.encode()), Ok(id));
        }

        #[test]
        fn never_panics_on_arbitrary_input(token in ".*") {
            if let Ok(id) = SpecId::decode(&token) {
                prop_assert_eq!(id.encode(), token);
            }
        }
    }
}
