//! Genre types

use serde::{Deserialize, Serialize};

pub type GenreId = i64;

/// A music genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// A genre with its album and track counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCounts {
    pub genre: Genre,
    pub album_count: i64,
    pub track_count: i64,
}
