//! Last.fm client
//!
//! Thin HTTP + XML client for the scrobbling and metadata calls the server
//! needs.
//!
//! # Features
//!
//! - **Metadata**: artist info, top tracks, similar artists and tracks
//! - **Auth**: exchange a user token for a session key
//! - **Scrobbling**: now-playing updates and listen submissions
//!
//! Any non-2xx response or `<lfm status="failed">` body is an error; no call
//! ever returns a partially populated value.
//!
//! # Example
//!
//! ```ignore
//! use gramophone_lastfm::LastFmClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LastFmClient::new()?;
//!     let session_key = client.get_session("api-key", "secret", "token").await?;
//!     println!("session: {session_key}");
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod signature;
mod types;

pub use client::{LastFmClient, DEFAULT_BASE_URL};
pub use error::{LastFmError, Result};
pub use signature::{param_signature, sign, SIGNATURE_PARAM};
pub use types::{
    Artist, ArtistBio, ArtistStats, ArtistTag, Image, Scrobble, Session, SimilarArtistList,
    SimilarArtists, SimilarTracks, TagList, TopTracks, Track, TrackArtist,
};
