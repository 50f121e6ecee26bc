//! Artist types

use crate::normalize;
use crate::specid::{SpecId, SpecKind};
use serde::{Deserialize, Serialize};

pub type ArtistId = i64;

/// An artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    /// Folded `name`, absent when identical
    pub name_udec: Option<String>,
    /// Cached mean of all ratings, `None` while unrated
    pub average_rating: Option<f64>,
}

impl Artist {
    #[must_use]
    pub fn sid(&self) -> SpecId {
        SpecId::new(SpecKind::Artist, self.id)
    }

    /// Name used for sorting and search indexes
    #[must_use]
    pub fn index_name(&self) -> &str {
        normalize::index_value(&self.name, self.name_udec.as_deref())
    }
}

/// Data for creating a new artist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArtist {
    pub name: String,
}

impl CreateArtist {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
