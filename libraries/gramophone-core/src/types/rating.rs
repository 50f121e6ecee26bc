//! Star and rating annotations
//!
//! Each user may star and rate every album, artist and track at most once.
//! Both kinds of annotation live in one table per target kind, keyed by
//! `(user, target)`.

use super::{AlbumId, ArtistId, TrackId, UserId};
use crate::error::{Error, Result};
use crate::specid::{SpecId, SpecKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entity a star or rating is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum AnnotationTarget {
    Album(AlbumId),
    Artist(ArtistId),
    Track(TrackId),
}

impl AnnotationTarget {
    /// Primary key of the target row
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Album(id) | Self::Artist(id) | Self::Track(id) => id,
        }
    }

    #[must_use]
    pub const fn sid(self) -> SpecId {
        match self {
            Self::Album(id) => SpecId::new(SpecKind::Album, id),
            Self::Artist(id) => SpecId::new(SpecKind::Artist, id),
            Self::Track(id) => SpecId::new(SpecKind::Track, id),
        }
    }

    /// Resolve a client identifier; only albums, artists and tracks can be annotated
    pub fn from_sid(sid: SpecId) -> Result<Self> {
        match sid.kind {
            SpecKind::Album => Ok(Self::Album(sid.value)),
            SpecKind::Artist => Ok(Self::Artist(sid.value)),
            SpecKind::Track => Ok(Self::Track(sid.value)),
            other => Err(Error::invalid_input(format!(
                "{other} cannot be starred or rated"
            ))),
        }
    }
}

/// A rating value, always within `1..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a raw rating
    pub fn new(value: i64) -> Result<Self> {
        match u8::try_from(value) {
            Ok(value) if (Self::MIN..=Self::MAX).contains(&value) => Ok(Self(value)),
            _ => Err(Error::constraint(format!(
                "rating {value} outside {}..={}",
                Self::MIN,
                Self::MAX
            ))),
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// A user's star on a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub user_id: UserId,
    pub target: AnnotationTarget,
    pub star_date: DateTime<Utc>,
}

/// A user's rating of a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRating {
    pub user_id: UserId,
    pub target: AnnotationTarget,
    pub rating: Rating,
}
