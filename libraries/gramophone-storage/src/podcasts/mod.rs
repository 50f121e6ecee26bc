//! Podcast subscriptions and their episodes
//!
//! Episodes belong to exactly one podcast and are deleted with it.

use crate::time::{now, to_datetime, to_optional_datetime};
use gramophone_core::types::{
    CreatePodcast, CreatePodcastEpisode, Podcast, PodcastAutoDownload, PodcastEpisode,
    PodcastEpisodeId, PodcastEpisodeStatus, PodcastId, UpdatePodcast,
};
use gramophone_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_PODCAST: &str = "SELECT id, updated_at, modified_at, url, title, description,
        image_url, image_path, error, auto_download
     FROM podcasts";

const SELECT_EPISODE: &str = "SELECT id, created_at, updated_at, modified_at, podcast_id, title,
        description, publish_date, audio_url, bitrate, length, size, path, filename, status, error
     FROM podcast_episodes";

fn map_podcast(row: &SqliteRow) -> Result<Podcast> {
    let auto_download: String = row.try_get("auto_download")?;

    Ok(Podcast {
        id: row.try_get("id")?,
        updated_at: to_datetime(row.try_get("updated_at")?),
        modified_at: to_datetime(row.try_get("modified_at")?),
        url: row.try_get("url")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        image_path: row.try_get("image_path")?,
        error: row.try_get("error")?,
        auto_download: PodcastAutoDownload::from_str(&auto_download)
            .ok_or_else(|| Error::Database(format!("unknown podcast auto download {auto_download:?}")))?,
    })
}

fn map_episode(row: &SqliteRow) -> Result<PodcastEpisode> {
    let status: String = row.try_get("status")?;

    Ok(PodcastEpisode {
        id: row.try_get("id")?,
        created_at: to_datetime(row.try_get("created_at")?),
        updated_at: to_datetime(row.try_get("updated_at")?),
        modified_at: to_datetime(row.try_get("modified_at")?),
        podcast_id: row.try_get("podcast_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        publish_date: to_optional_datetime(row.try_get("publish_date")?),
        audio_url: row.try_get("audio_url")?,
        bitrate: row.try_get("bitrate")?,
        length: row.try_get("length")?,
        size: row.try_get("size")?,
        path: row.try_get("path")?,
        filename: row.try_get("filename")?,
        status: PodcastEpisodeStatus::from_str(&status)
            .ok_or_else(|| Error::Database(format!("unknown podcast episode status {status:?}")))?,
        error: row.try_get("error")?,
    })
}

// ============================================================================
// Podcasts
// ============================================================================

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Podcast>> {
    let rows = sqlx::query(&format!("{SELECT_PODCAST} ORDER BY title COLLATE NOCASE, id"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_podcast).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: PodcastId) -> Result<Option<Podcast>> {
    let row = sqlx::query(&format!("{SELECT_PODCAST} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_podcast).transpose()
}

pub async fn create(pool: &SqlitePool, podcast: CreatePodcast) -> Result<Podcast> {
    let ts = now();

    let result = sqlx::query(
        "INSERT INTO podcasts (updated_at, modified_at, url, title, description, image_url, auto_download)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(ts)
    .bind(ts)
    .bind(&podcast.url)
    .bind(&podcast.title)
    .bind(&podcast.description)
    .bind(&podcast.image_url)
    .bind(podcast.auto_download.as_str())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::info!(id, url = %podcast.url, "Podcast added");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Podcast", id))
}

/// Update a podcast (only provided fields change)
///
/// `error: Some(None)` clears a previous refresh error.
pub async fn update(pool: &SqlitePool, id: PodcastId, podcast: UpdatePodcast) -> Result<Podcast> {
    let (set_error, error) = match podcast.error {
        Some(error) => (true, error),
        None => (false, None),
    };

    let result = sqlx::query(
        "UPDATE podcasts
         SET title = COALESCE(?, title),
             description = COALESCE(?, description),
             image_url = COALESCE(?, image_url),
             image_path = COALESCE(?, image_path),
             error = CASE WHEN ? THEN ? ELSE error END,
             auto_download = COALESCE(?, auto_download),
             updated_at = ?
         WHERE id = ?",
    )
    .bind(&podcast.title)
    .bind(&podcast.description)
    .bind(&podcast.image_url)
    .bind(&podcast.image_path)
    .bind(set_error)
    .bind(&error)
    .bind(podcast.auto_download.map(|auto| auto.as_str()))
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Podcast", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Podcast", id))
}

/// Delete a podcast and all of its episodes
pub async fn delete(pool: &SqlitePool, id: PodcastId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM podcasts WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Podcast", id));
    }

    tx.commit().await?;
    tracing::info!(id, "Podcast deleted");

    Ok(())
}

// ============================================================================
// Episodes
// ============================================================================

pub async fn get_episode(pool: &SqlitePool, id: PodcastEpisodeId) -> Result<Option<PodcastEpisode>> {
    let row = sqlx::query(&format!("{SELECT_EPISODE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_episode).transpose()
}

/// Episodes of a podcast, newest first
pub async fn get_episodes_by_podcast(pool: &SqlitePool, podcast_id: PodcastId) -> Result<Vec<PodcastEpisode>> {
    let rows = sqlx::query(&format!(
        "{SELECT_EPISODE} WHERE podcast_id = ? ORDER BY publish_date DESC, id DESC"
    ))
    .bind(podcast_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_episode).collect()
}

/// Most recently published episodes across all podcasts
pub async fn get_newest_episodes(pool: &SqlitePool, limit: u32) -> Result<Vec<PodcastEpisode>> {
    let rows = sqlx::query(&format!(
        "{SELECT_EPISODE} WHERE status != 'deleted' ORDER BY publish_date DESC, id DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_episode).collect()
}

/// Add an episode
///
/// # Errors
///
/// [`Error::ForeignKeyViolation`] if the podcast does not exist
pub async fn create_episode(pool: &SqlitePool, episode: CreatePodcastEpisode) -> Result<PodcastEpisode> {
    let ts = now();

    let result = sqlx::query(
        "INSERT INTO podcast_episodes (
            created_at, updated_at, modified_at, podcast_id, title, description, publish_date,
            audio_url, bitrate, length, size, filename, status
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(ts)
    .bind(ts)
    .bind(ts)
    .bind(episode.podcast_id)
    .bind(&episode.title)
    .bind(&episode.description)
    .bind(episode.publish_date.map(|date| date.timestamp()))
    .bind(&episode.audio_url)
    .bind(episode.bitrate)
    .bind(episode.length)
    .bind(episode.size)
    .bind(&episode.filename)
    .bind(episode.status.as_str())
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!(id, podcast_id = episode.podcast_id, "Podcast episode added");

    get_episode(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("PodcastEpisode", id))
}

/// Record a download state change
///
/// `path` is kept when `None`; `error` is always overwritten.
pub async fn set_episode_status(
    pool: &SqlitePool,
    id: PodcastEpisodeId,
    status: PodcastEpisodeStatus,
    path: Option<&str>,
    error: Option<&str>,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE podcast_episodes
         SET status = ?, path = COALESCE(?, path), error = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(status.as_str())
    .bind(path)
    .bind(error)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("PodcastEpisode", id));
    }

    tracing::debug!(id, %status, "Podcast episode status changed");

    Ok(())
}

pub async fn delete_episode(pool: &SqlitePool, id: PodcastEpisodeId) -> Result<()> {
    let result = sqlx::query("DELETE FROM podcast_episodes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("PodcastEpisode", id));
    }

    Ok(())
}
