//! Track types
//!
//! Tracks always belong to exactly one album. Filesystem paths are derived
//! from the owning album's location and never stored.

use super::{AlbumId, AlbumLocation, Genre};
use crate::normalize;
use crate::specid::{SpecId, SpecKind};
use crate::traits::AudioFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub type TrackId = i64;

/// A track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub filename: String,
    pub filename_udec: Option<String>,
    pub album_id: AlbumId,
    pub size: i64,
    pub length: i64,
    pub bitrate: i64,
    pub tag_title: Option<String>,
    pub tag_title_udec: Option<String>,
    pub tag_track_artist: Option<String>,
    pub tag_track_number: Option<i32>,
    pub tag_disc_number: Option<i32>,
    pub tag_brainz_id: Option<String>,
    pub average_rating: Option<f64>,

    /// Owning album's location, when the relation was loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<AlbumLocation>,

    /// Loaded on demand
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Genre>,
}

impl Track {
    #[must_use]
    pub fn sid(&self) -> SpecId {
        SpecId::new(SpecKind::Track, self.id)
    }

    #[must_use]
    pub fn album_sid(&self) -> SpecId {
        SpecId::new(SpecKind::Album, self.album_id)
    }

    #[must_use]
    pub fn index_filename(&self) -> &str {
        normalize::index_value(&self.filename, self.filename_udec.as_deref())
    }

    /// `root_dir/left_path/right_path/filename`, `None` if the album was not loaded
    #[must_use]
    pub fn abs_path(&self) -> Option<PathBuf> {
        let album = self.album.as_ref()?;
        Some(join_segments(&[
            &album.root_dir,
            &album.left_path,
            &album.right_path,
            &self.filename,
        ]))
    }

    /// `left_path/right_path/filename`, `None` if the album was not loaded
    #[must_use]
    pub fn rel_path(&self) -> Option<PathBuf> {
        let album = self.album.as_ref()?;
        Some(join_segments(&[
            &album.left_path,
            &album.right_path,
            &self.filename,
        ]))
    }

    #[must_use]
    pub fn genre_strings(&self) -> Vec<String> {
        self.genres.iter().map(|genre| genre.name.clone()).collect()
    }
}

// Empty segments are skipped so an empty left path does not add a separator.
fn join_segments(segments: &[&str]) -> PathBuf {
    segments
        .iter()
        .filter(|segment| !segment.is_empty())
        .fold(PathBuf::new(), |path, segment| path.join(segment))
}

impl AudioFile for Track {
    fn audio_filename(&self) -> &str {
        &self.filename
    }

    fn audio_bitrate(&self) -> i64 {
        self.bitrate
    }

    fn audio_length(&self) -> i64 {
        self.length
    }
}

/// Data for creating a new track
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTrack {
    pub album_id: AlbumId,
    pub filename: String,
    pub size: i64,
    pub length: i64,
    pub bitrate: i64,
    pub tag_title: Option<String>,
    pub tag_track_artist: Option<String>,
    pub tag_track_number: Option<i32>,
    pub tag_disc_number: Option<i32>,
    pub tag_brainz_id: Option<String>,
}

/// Data for updating a track (only provided fields change)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTrack {
    pub size: Option<i64>,
    pub length: Option<i64>,
    pub bitrate: Option<i64>,
    pub tag_title: Option<String>,
    pub tag_track_artist: Option<String>,
    pub tag_track_number: Option<i32>,
    pub tag_disc_number: Option<i32>,
    pub tag_brainz_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track {
            id: 5,
            created_at: DateTime::default(),
            updated_at: DateTime::default(),
            filename: "01 - Song.flac".to_string(),
            filename_udec: None,
            album_id: 2,
            size: 1024,
            length: 180,
            bitrate: 900,
            tag_title: Some("Song".to_string()),
            tag_title_udec: None,
            tag_track_artist: None,
            tag_track_number: Some(1),
            tag_disc_number: Some(1),
            tag_brainz_id: None,
            average_rating: None,
            album: None,
            genres: Vec::new(),
        }
    }

    #[test]
    fn paths_empty_without_album() {
        let track = track();
        assert_eq!(track.abs_path(), None);
        assert_eq!(track.rel_path(), None);
    }

    #[test]
    fn paths_joined_from_album_location() {
        let mut track = track();
        track.album = Some(AlbumLocation {
            root_dir: "/music".to_string(),
            left_path: "Artist".to_string(),
            right_path: "Album".to_string(),
        });
        assert_eq!(
            track.abs_path(),
            Some(PathBuf::from("/music/Artist/Album/01 - Song.flac"))
        );
        assert_eq!(
            track.rel_path(),
            Some(PathBuf::from("Artist/Album/01 - Song.flac"))
        );
    }

    #[test]
    fn empty_left_path_is_skipped() {
        let mut track = track();
        track.album = Some(AlbumLocation {
            root_dir: "/music".to_string(),
            left_path: String::new(),
            right_path: "Album".to_string(),
        });
        assert_eq!(
            track.rel_path(),
            Some(PathBuf::from("Album/01 - Song.flac"))
        );
    }

    #[test]
    fn derived_identifiers() {
        let track = track();
        assert_eq!(track.sid().to_string(), "tr-5");
        assert_eq!(track.album_sid().to_string(), "al-2");
    }

    #[test]
    fn audio_file_capability() {
        let track = track();
        assert_eq!(track.ext(), ".flac");
        assert_eq!(track.audio_bitrate(), 900);
        assert_eq!(track.audio_length(), 180);
        assert_eq!(track.audio_filename(), "01 - Song.flac");
    }
}
