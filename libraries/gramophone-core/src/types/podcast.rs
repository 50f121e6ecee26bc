//! Podcast types

use crate::specid::{SpecId, SpecKind};
use crate::traits::AudioFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PodcastId = i64;
pub type PodcastEpisodeId = i64;

/// Which new episodes get downloaded automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodcastAutoDownload {
    Latest,
    #[default]
    None,
}

impl PodcastAutoDownload {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::None => "none",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "latest" => Some(Self::Latest),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Lifecycle of a podcast episode download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodcastEpisodeStatus {
    Downloading,
    #[default]
    Skipped,
    Deleted,
    Completed,
    Error,
}

impl PodcastEpisodeStatus {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Downloading => "downloading",
            Self::Skipped => "skipped",
            Self::Deleted => "deleted",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "downloading" => Some(Self::Downloading),
            "skipped" => Some(Self::Skipped),
            "deleted" => Some(Self::Deleted),
            "completed" => Some(Self::Completed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for PodcastEpisodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A subscribed podcast feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: PodcastId,
    pub updated_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub url: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    /// Last feed refresh error, if any
    pub error: Option<String>,
    pub auto_download: PodcastAutoDownload,
}

impl Podcast {
    #[must_use]
    pub fn sid(&self) -> SpecId {
        SpecId::new(SpecKind::Podcast, self.id)
    }
}

/// Data for creating a new podcast
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePodcast {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub auto_download: PodcastAutoDownload,
}

/// Data for updating a podcast (only provided fields change)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePodcast {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    /// `Some(None)` clears a previous error
    pub error: Option<Option<String>>,
    pub auto_download: Option<PodcastAutoDownload>,
}

/// A single episode of a podcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastEpisode {
    pub id: PodcastEpisodeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub podcast_id: PodcastId,
    pub title: String,
    pub description: String,
    pub publish_date: Option<DateTime<Utc>>,
    pub audio_url: String,
    pub bitrate: i64,
    pub length: i64,
    pub size: i64,
    /// Download location, once downloaded
    pub path: Option<String>,
    pub filename: String,
    pub status: PodcastEpisodeStatus,
    pub error: Option<String>,
}

impl PodcastEpisode {
    #[must_use]
    pub fn sid(&self) -> SpecId {
        SpecId::new(SpecKind::PodcastEpisode, self.id)
    }

    #[must_use]
    pub fn podcast_sid(&self) -> SpecId {
        SpecId::new(SpecKind::Podcast, self.podcast_id)
    }
}

impl AudioFile for PodcastEpisode {
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

/// Data for creating a new episode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePodcastEpisode {
    pub podcast_id: PodcastId,
    pub title: String,
    pub description: String,
    pub publish_date: Option<DateTime<Utc>>,
    pub audio_url: String,
    pub bitrate: i64,
    pub length: i64,
    pub size: i64,
    pub filename: String,
    pub status: PodcastEpisodeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        for status in [
            PodcastEpisodeStatus::Downloading,
            PodcastEpisodeStatus::Skipped,
            PodcastEpisodeStatus::Deleted,
            PodcastEpisodeStatus::Completed,
            PodcastEpisodeStatus::Error,
        ] {
            assert_eq!(PodcastEpisodeStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(PodcastEpisodeStatus::from_str("paused"), None);
    }

    #[test]
    fn auto_download_strings() {
        assert_eq!(PodcastAutoDownload::from_str("latest"), Some(PodcastAutoDownload::Latest));
        assert_eq!(PodcastAutoDownload::None.as_str(), "none");
    }

    #[test]
    fn episode_is_an_audio_file() {
        let episode = PodcastEpisode {
            id: 4,
            created_at: DateTime::default(),
            updated_at: DateTime::default(),
            modified_at: DateTime::default(),
            podcast_id: 2,
            title: "Episode".to_string(),
            description: String::new(),
            publish_date: None,
            audio_url: "https://example.com/ep.mp3".to_string(),
            bitrate: 128,
            length: 3600,
            size: 0,
            path: None,
            filename: "ep.mp3".to_string(),
            status: PodcastEpisodeStatus::Completed,
            error: None,
        };
        assert_eq!(episode.mime(), "audio/mpeg");
        assert_eq!(episode.sid().to_string(), "pe-4");
        assert_eq!(episode.podcast_sid().to_string(), "pd-2");
    }
}
