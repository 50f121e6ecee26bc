mod album;
mod artist;
mod bookmark;
mod genre;
mod play;
mod play_queue;
mod podcast;
mod radio;
mod rating;
mod track;
mod transcode;
mod user;

pub use album::{Album, AlbumId, AlbumLocation, AlbumStats, CreateAlbum, UpdateAlbum};
pub use artist::{Artist, ArtistId, CreateArtist};
pub use bookmark::Bookmark;
pub use genre::{Genre, GenreCounts, GenreId};
pub use play::Play;
pub use play_queue::{join_ids, split_ids, PlayQueue};
pub use podcast::{
    CreatePodcast, CreatePodcastEpisode, Podcast, PodcastAutoDownload, PodcastEpisode,
    PodcastEpisodeId, PodcastEpisodeStatus, PodcastId, UpdatePodcast,
};
pub use radio::{CreateInternetRadioStation, InternetRadioStation, InternetRadioStationId};
pub use rating::{AnnotationTarget, Rating, Star, UserRating};
pub use track::{CreateTrack, Track, TrackId, UpdateTrack};
pub use transcode::TranscodePreference;
pub use user::{CreateUser, UpdateUser, User, UserId};
