//! Last.fm response payloads and scrobble submissions
//!
//! Attributes map to `@name` fields and element text to `$text`, following
//! the `quick-xml` serde conventions. Missing elements deserialize to their
//! defaults.

use chrono::{DateTime, Utc};
use gramophone_core::types::Track as LibraryTrack;
use serde::Deserialize;

/// `<image size="...">url</image>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Image {
    #[serde(rename = "@size", default)]
    pub size: String,
    #[serde(rename = "$text", default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArtistStats {
    #[serde(default)]
    pub listeners: String,
    #[serde(default)]
    pub playcount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArtistBio {
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArtistTag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimilarArtistList {
    #[serde(rename = "artist", default)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagList {
    #[serde(rename = "tag", default)]
    pub tags: Vec<ArtistTag>,
}

/// `artist.getInfo` payload, also used for similar-artist entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mbid: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub streamable: String,
    #[serde(rename = "image", default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub stats: ArtistStats,
    #[serde(default)]
    pub similar: SimilarArtistList,
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub bio: ArtistBio,
}

/// Artist reference nested in a track entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrackArtist {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mbid: String,
    #[serde(default)]
    pub url: String,
}

/// Track entry of top/similar track lists
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Track {
    #[serde(rename = "@rank", default)]
    pub rank: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mbid: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub playcount: u64,
    #[serde(default)]
    pub listeners: u64,
    /// Similarity score, only present in similar-track lists
    #[serde(rename = "match", default)]
    pub similarity: f64,
    #[serde(default)]
    pub artist: TrackArtist,
    #[serde(rename = "image", default)]
    pub images: Vec<Image>,
}

/// `artist.getTopTracks` payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TopTracks {
    #[serde(rename = "@artist", default)]
    pub artist: String,
    #[serde(rename = "track", default)]
    pub tracks: Vec<Track>,
}

/// `artist.getSimilar` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimilarArtists {
    #[serde(rename = "@artist", default)]
    pub artist: String,
    #[serde(rename = "artist", default)]
    pub artists: Vec<Artist>,
}

/// `track.getSimilar` payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimilarTracks {
    #[serde(rename = "@artist", default)]
    pub artist: String,
    #[serde(rename = "@track", default)]
    pub track: String,
    #[serde(rename = "track", default)]
    pub tracks: Vec<Track>,
}

/// `auth.getSession` payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub subscriber: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiError {
    #[serde(rename = "@code", default)]
    pub code: u32,
    #[serde(rename = "$text", default)]
    pub message: String,
}

/// `<lfm status="...">` envelope; only the element matching the call is set
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "@status", default)]
    pub status: String,
    pub error: Option<ApiError>,
    pub artist: Option<Artist>,
    pub toptracks: Option<TopTracks>,
    pub similarartists: Option<SimilarArtists>,
    pub similartracks: Option<SimilarTracks>,
    pub session: Option<Session>,
}

/// One listen to submit with `track.scrobble` or `track.updateNowPlaying`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrobble {
    pub artist: String,
    pub track: String,
    pub album: Option<String>,
    pub track_number: Option<i32>,
    pub duration: Option<i64>,
    pub mbid: Option<String>,
    /// Start of playback; ignored for now-playing updates
    pub timestamp: DateTime<Utc>,
}

impl Scrobble {
    /// Build a submission from a library track
    ///
    /// Falls back to the filename when the track has no title tag and to
    /// `album_artist` when it has no track artist tag.
    #[must_use]
    pub fn from_track(
        track: &LibraryTrack,
        album_artist: &str,
        album: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            artist: track
                .tag_track_artist
                .clone()
                .unwrap_or_else(|| album_artist.to_owned()),
            track: track
                .tag_title
                .clone()
                .unwrap_or_else(|| track.filename.clone()),
            album: album.map(str::to_owned),
            track_number: track.tag_track_number,
            duration: (track.length > 0).then_some(track.length),
            mbid: track.tag_brainz_id.clone(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_envelope_parses_error() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<lfm status="failed">
  <error code="6">The artist you supplied could not be found</error>
</lfm>"#;

        let envelope: Envelope = quick_xml::de::from_str(body).unwrap();
        assert_eq!(envelope.status, "failed");
        let error = envelope.error.unwrap();
        assert_eq!(error.code, 6);
        assert_eq!(error.message, "The artist you supplied could not be found");
    }

    #[test]
    fn session_envelope() {
        let body = r#"<lfm status="ok">
  <session>
    <name>user1</name>
    <key>sessionKey1</key>
    <subscriber>0</subscriber>
  </session>
</lfm>"#;

        let envelope: Envelope = quick_xml::de::from_str(body).unwrap();
        assert_eq!(envelope.status, "ok");
        assert_eq!(envelope.session.unwrap().key, "sessionKey1");
        assert!(envelope.artist.is_none());
    }

    #[test]
    fn scrobble_from_track_falls_back() {
        let track = LibraryTrack {
            id: 1,
            created_at: DateTime::default(),
            updated_at: DateTime::default(),
            filename: "01 Untitled.flac".to_string(),
            filename_udec: None,
            album_id: 1,
            size: 0,
            length: 0,
            bitrate: 0,
            tag_title: None,
            tag_title_udec: None,
            tag_track_artist: None,
            tag_track_number: Some(1),
            tag_disc_number: None,
            tag_brainz_id: None,
            average_rating: None,
            album: None,
            genres: Vec::new(),
        };

        let scrobble = Scrobble::from_track(&track, "Album Artist", Some("Album"), DateTime::default());
        assert_eq!(scrobble.artist, "Album Artist");
        assert_eq!(scrobble.track, "01 Untitled.flac");
        assert_eq!(scrobble.duration, None);
        assert_eq!(scrobble.album.as_deref(), Some("Album"));
    }
}
