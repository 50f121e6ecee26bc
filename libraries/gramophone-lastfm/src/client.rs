//! Last.fm API client.

use crate::error::{LastFmError, Result};
use crate::signature::sign;
use crate::types::{Artist, Envelope, Scrobble, SimilarArtists, SimilarTracks, TopTracks};
use reqwest::{Client, Response};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

type Params = BTreeMap<String, String>;

/// Client for the Last.fm web service.
///
/// Read calls only need an API key. `auth.getSession`, scrobbles and
/// now-playing updates are signed with the shared secret.
///
/// # Example
///
/// ```ignore
/// use gramophone_lastfm::LastFmClient;
///
/// let client = LastFmClient::new()?;
/// let artist = client.artist_get_info("api-key", "Radiohead").await?;
/// println!("{} has {} listeners", artist.name, artist.stats.listeners);
/// ```
#[derive(Debug, Clone)]
pub struct LastFmClient {
    http: Client,
    base_url: Url,
}

impl LastFmClient {
    /// Client for the production endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client for another endpoint (proxies, mock servers)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(LastFmError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = Url::parse(base_url).map_err(|e| LastFmError::InvalidUrl(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(LastFmError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("gramophone/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub async fn artist_get_info(&self, api_key: &str, artist: &str) -> Result<Artist> {
        let params = query_params([("method", "artist.getInfo"), ("api_key", api_key), ("artist", artist)]);
        let envelope = self.get(params).await?;

        envelope.artist.ok_or(LastFmError::MissingElement("artist"))
    }

    pub async fn artist_get_top_tracks(&self, api_key: &str, artist: &str) -> Result<TopTracks> {
        let params = query_params([
            ("method", "artist.getTopTracks"),
            ("api_key", api_key),
            ("artist", artist),
        ]);
        let envelope = self.get(params).await?;

        envelope.toptracks.ok_or(LastFmError::MissingElement("toptracks"))
    }

    pub async fn artist_get_similar(&self, api_key: &str, artist: &str) -> Result<SimilarArtists> {
        let params = query_params([
            ("method", "artist.getSimilar"),
            ("api_key", api_key),
            ("artist", artist),
        ]);
        let envelope = self.get(params).await?;

        envelope
            .similarartists
            .ok_or(LastFmError::MissingElement("similarartists"))
    }

    pub async fn track_get_similar(&self, api_key: &str, artist: &str, track: &str) -> Result<SimilarTracks> {
        let params = query_params([
            ("method", "track.getSimilar"),
            ("api_key", api_key),
            ("artist", artist),
            ("track", track),
        ]);
        let envelope = self.get(params).await?;

        envelope
            .similartracks
            .ok_or(LastFmError::MissingElement("similartracks"))
    }

    // =========================================================================
    // Authenticated calls
    // =========================================================================

    /// Exchange an authorization token for a session key
    pub async fn get_session(&self, api_key: &str, secret: &str, token: &str) -> Result<String> {
        let mut params = query_params([("method", "auth.getSession"), ("api_key", api_key), ("token", token)]);
        sign(&mut params, secret);

        let envelope = self.get(params).await?;
        let session = envelope.session.ok_or(LastFmError::MissingElement("session"))?;

        info!(user = %session.name, "Last.fm session obtained");
        Ok(session.key)
    }

    /// Submit a completed listen
    pub async fn scrobble(&self, api_key: &str, secret: &str, session_key: &str, scrobble: &Scrobble) -> Result<()> {
        let mut params = track_params("track.scrobble", api_key, session_key, scrobble);
        params.insert("timestamp".to_owned(), scrobble.timestamp.timestamp().to_string());
        sign(&mut params, secret);

        self.post(params).await?;
        debug!(artist = %scrobble.artist, track = %scrobble.track, "Scrobbled");
        Ok(())
    }

    /// Announce the track that just started playing
    pub async fn update_now_playing(
        &self,
        api_key: &str,
        secret: &str,
        session_key: &str,
        scrobble: &Scrobble,
    ) -> Result<()> {
        let mut params = track_params("track.updateNowPlaying", api_key, session_key, scrobble);
        sign(&mut params, secret);

        self.post(params).await?;
        debug!(artist = %scrobble.artist, track = %scrobble.track, "Now playing updated");
        Ok(())
    }

    // =========================================================================
    // Transport
    // =========================================================================

    async fn get(&self, params: Params) -> Result<Envelope> {
        debug!(method = params.get("method").map(String::as_str), "GET Last.fm");

        let response = self
            .http
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await?;

        Self::read_envelope(response).await
    }

    async fn post(&self, params: Params) -> Result<Envelope> {
        debug!(method = params.get("method").map(String::as_str), "POST Last.fm");

        let response = self
            .http
            .post(self.base_url.clone())
            .form(&params)
            .send()
            .await?;

        Self::read_envelope(response).await
    }

    async fn read_envelope(response: Response) -> Result<Envelope> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Last.fm request failed");
            return Err(LastFmError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: Envelope = quick_xml::de::from_str(&body)?;

        if envelope.status == "failed" {
            let error = envelope.error.unwrap_or_default();
            warn!(code = error.code, message = %error.message, "Last.fm API error");
            return Err(LastFmError::Api {
                code: error.code,
                message: error.message,
            });
        }

        Ok(envelope)
    }
}

fn query_params<const N: usize>(pairs: [(&str, &str); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

fn track_params(method: &str, api_key: &str, session_key: &str, scrobble: &Scrobble) -> Params {
    let mut params = query_params([
        ("method", method),
        ("api_key", api_key),
        ("sk", session_key),
        ("artist", scrobble.artist.as_str()),
        ("track", scrobble.track.as_str()),
    ]);

    if let Some(album) = &scrobble.album {
        params.insert("album".to_owned(), album.clone());
    }
    if let Some(track_number) = scrobble.track_number {
        params.insert("trackNumber".to_owned(), track_number.to_string());
    }
    if let Some(duration) = scrobble.duration {
        params.insert("duration".to_owned(), duration.to_string());
    }
    if let Some(mbid) = &scrobble.mbid {
        params.insert("mbid".to_owned(), mbid.clone());
    }

    params
}
