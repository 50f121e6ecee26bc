//! Album types
//!
//! An album is a directory in the music library. It is located by
//! `(root_dir, left_path, right_path)`: the library root, the path between the
//! root and the album's parent directory, and the album directory name.

use super::{Artist, Genre};
use crate::normalize;
use crate::specid::{SpecId, SpecKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AlbumId = i64;

/// An album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub left_path: String,
    pub right_path: String,
    /// Folded `right_path`, absent when identical
    pub right_path_udec: Option<String>,
    /// Parent directory album, resolved by query rather than held inline
    pub parent_id: Option<AlbumId>,
    pub root_dir: String,
    pub cover: Option<String>,
    pub tag_title: Option<String>,
    pub tag_title_udec: Option<String>,
    pub tag_brainz_id: Option<String>,
    pub tag_year: Option<i32>,
    /// Cached mean of all ratings, `None` while unrated
    pub average_rating: Option<f64>,

    /// Loaded on demand, in the order the join rows were returned
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Genre>,

    /// Loaded on demand
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artists: Vec<Artist>,
}

impl Album {
    #[must_use]
    pub fn sid(&self) -> SpecId {
        SpecId::new(SpecKind::Album, self.id)
    }

    #[must_use]
    pub fn parent_sid(&self) -> Option<SpecId> {
        self.parent_id.map(|id| SpecId::new(SpecKind::Album, id))
    }

    /// Directory name used for sorting and search indexes
    #[must_use]
    pub fn index_right_path(&self) -> &str {
        normalize::index_value(&self.right_path, self.right_path_udec.as_deref())
    }

    /// Location of the album directory, for deriving track paths
    #[must_use]
    pub fn location(&self) -> AlbumLocation {
        AlbumLocation {
            root_dir: self.root_dir.clone(),
            left_path: self.left_path.clone(),
            right_path: self.right_path.clone(),
        }
    }

    #[must_use]
    pub fn genre_strings(&self) -> Vec<String> {
        self.genres.iter().map(|genre| genre.name.clone()).collect()
    }

    /// Artist names ordered by artist id, independent of join row order
    #[must_use]
    pub fn artists_strings(&self) -> Vec<String> {
        let mut artists: Vec<&Artist> = self.artists.iter().collect();
        artists.sort_by_key(|artist| artist.id);
        artists.into_iter().map(|artist| artist.name.clone()).collect()
    }
}

/// The three path segments that locate an album directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumLocation {
    pub root_dir: String,
    pub left_path: String,
    pub right_path: String,
}

/// Data for creating a new album
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAlbum {
    pub root_dir: String,
    pub left_path: String,
    pub right_path: String,
    pub parent_id: Option<AlbumId>,
    pub cover: Option<String>,
    pub tag_title: Option<String>,
    pub tag_brainz_id: Option<String>,
    pub tag_year: Option<i32>,
}

/// Data for updating an album (only provided fields change)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAlbum {
    pub cover: Option<String>,
    pub tag_title: Option<String>,
    pub tag_brainz_id: Option<String>,
    pub tag_year: Option<i32>,
}

/// Child and track counts plus total duration of an album
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumStats {
    pub child_count: i64,
    pub track_count: i64,
    pub duration: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album() -> Album {
        Album {
            id: 1,
            created_at: DateTime::default(),
            updated_at: DateTime::default(),
            modified_at: DateTime::default(),
            left_path: "Artist/".to_string(),
            right_path: "Álbum".to_string(),
            right_path_udec: Some("Album".to_string()),
            parent_id: None,
            root_dir: "/music".to_string(),
            cover: None,
            tag_title: None,
            tag_title_udec: None,
            tag_brainz_id: None,
            tag_year: None,
            average_rating: None,
            genres: Vec::new(),
            artists: Vec::new(),
        }
    }

    fn artist(id: i64, name: &str) -> Artist {
        Artist {
            id,
            name: name.to_string(),
            name_udec: None,
            average_rating: None,
        }
    }

    #[test]
    fn artists_strings_sorted_by_id() {
        let mut album = album();
        album.artists = vec![artist(3, "three"), artist(1, "one"), artist(2, "two")];
        assert_eq!(album.artists_strings(), vec!["one", "two", "three"]);
        // the loaded relation itself is left untouched
        assert_eq!(album.artists[0].id, 3);
    }

    #[test]
    fn genre_strings_keep_row_order() {
        let mut album = album();
        album.genres = vec![
            Genre { id: 2, name: "rock".to_string() },
            Genre { id: 1, name: "jazz".to_string() },
        ];
        assert_eq!(album.genre_strings(), vec!["rock", "jazz"]);
    }

    #[test]
    fn parent_sid_absent_without_parent() {
        let mut album = album();
        assert_eq!(album.parent_sid(), None);
        album.parent_id = Some(9);
        assert_eq!(album.parent_sid().map(|sid| sid.to_string()), Some("al-9".to_string()));
    }

    #[test]
    fn index_right_path_prefers_folded() {
        let mut album = album();
        assert_eq!(album.index_right_path(), "Album");
        album.right_path_udec = None;
        assert_eq!(album.index_right_path(), "Álbum");
    }
}
