//! Tracks
//!
//! A track row always points at an existing album. Reads join the album so
//! that `Track::abs_path`/`rel_path` work without another query.

use crate::genres;
use crate::time::{now, to_datetime};
use gramophone_core::normalize;
use gramophone_core::types::{AlbumId, AlbumLocation, CreateTrack, Track, TrackId, UpdateTrack};
use gramophone_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_TRACK: &str = "SELECT t.id, t.created_at, t.updated_at, t.filename, t.filename_udec,
        t.album_id, t.size, t.length, t.bitrate, t.tag_title, t.tag_title_udec,
        t.tag_track_artist, t.tag_track_number, t.tag_disc_number, t.tag_brainz_id,
        t.average_rating,
        al.root_dir AS album_root_dir, al.left_path AS album_left_path,
        al.right_path AS album_right_path
     FROM tracks t
     INNER JOIN albums al ON al.id = t.album_id";

fn map_track(row: &SqliteRow) -> Result<Track> {
    Ok(Track {
        id: row.try_get("id")?,
        created_at: to_datetime(row.try_get("created_at")?),
        updated_at: to_datetime(row.try_get("updated_at")?),
        filename: row.try_get("filename")?,
        filename_udec: row.try_get("filename_udec")?,
        album_id: row.try_get("album_id")?,
        size: row.try_get("size")?,
        length: row.try_get("length")?,
        bitrate: row.try_get("bitrate")?,
        tag_title: row.try_get("tag_title")?,
        tag_title_udec: row.try_get("tag_title_udec")?,
        tag_track_artist: row.try_get("tag_track_artist")?,
        tag_track_number: row.try_get("tag_track_number")?,
        tag_disc_number: row.try_get("tag_disc_number")?,
        tag_brainz_id: row.try_get("tag_brainz_id")?,
        average_rating: row.try_get("average_rating")?,
        album: Some(AlbumLocation {
            root_dir: row.try_get("album_root_dir")?,
            left_path: row.try_get("album_left_path")?,
            right_path: row.try_get("album_right_path")?,
        }),
        genres: Vec::new(),
    })
}

pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(&format!("{SELECT_TRACK} WHERE t.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_track).transpose()
}

/// Track with its genres loaded
pub async fn get_with_genres(pool: &SqlitePool, id: TrackId) -> Result<Track> {
    let mut track = get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Track", id))?;

    track.genres = genres::get_by_track(pool, id).await?;

    Ok(track)
}

/// Tracks of an album in disc, track number, filename order
pub async fn get_by_album(pool: &SqlitePool, album_id: AlbumId) -> Result<Vec<Track>> {
    let rows = sqlx::query(&format!(
        "{SELECT_TRACK} WHERE t.album_id = ?
         ORDER BY t.tag_disc_number, t.tag_track_number, t.filename"
    ))
    .bind(album_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_track).collect()
}

pub async fn find_by_filename(
    pool: &SqlitePool,
    album_id: AlbumId,
    filename: &str,
) -> Result<Option<Track>> {
    let row = sqlx::query(&format!(
        "{SELECT_TRACK} WHERE t.album_id = ? AND t.filename = ?"
    ))
    .bind(album_id)
    .bind(filename)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_track).transpose()
}

/// Create a track
///
/// # Errors
///
/// * [`Error::ForeignKeyViolation`] if the album does not exist
/// * [`Error::UniqueViolation`] if the album already has a track with this filename
pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    let ts = now();
    let filename_udec = normalize::fold(&track.filename);
    let tag_title_udec = track.tag_title.as_deref().and_then(normalize::fold);

    let result = sqlx::query(
        "INSERT INTO tracks (
            created_at, updated_at, filename, filename_udec, album_id, size, length, bitrate,
            tag_title, tag_title_udec, tag_track_artist, tag_track_number, tag_disc_number,
            tag_brainz_id
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(ts)
    .bind(ts)
    .bind(&track.filename)
    .bind(&filename_udec)
    .bind(track.album_id)
    .bind(track.size)
    .bind(track.length)
    .bind(track.bitrate)
    .bind(&track.tag_title)
    .bind(&tag_title_udec)
    .bind(&track.tag_track_artist)
    .bind(track.tag_track_number)
    .bind(track.tag_disc_number)
    .bind(&track.tag_brainz_id)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!(id, album_id = track.album_id, filename = %track.filename, "Track created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Track", id))
}

/// Update track metadata (only provided fields change)
pub async fn update(pool: &SqlitePool, id: TrackId, track: UpdateTrack) -> Result<Track> {
    let tag_title_udec = track.tag_title.as_deref().and_then(normalize::fold);

    let result = sqlx::query(
        "UPDATE tracks
         SET size = COALESCE(?, size),
             length = COALESCE(?, length),
             bitrate = COALESCE(?, bitrate),
             tag_title_udec = CASE WHEN ? IS NOT NULL THEN ? ELSE tag_title_udec END,
             tag_title = COALESCE(?, tag_title),
             tag_track_artist = COALESCE(?, tag_track_artist),
             tag_track_number = COALESCE(?, tag_track_number),
             tag_disc_number = COALESCE(?, tag_disc_number),
             tag_brainz_id = COALESCE(?, tag_brainz_id),
             updated_at = ?
         WHERE id = ?",
    )
    .bind(track.size)
    .bind(track.length)
    .bind(track.bitrate)
    .bind(&track.tag_title)
    .bind(&tag_title_udec)
    .bind(&track.tag_title)
    .bind(&track.tag_track_artist)
    .bind(track.tag_track_number)
    .bind(track.tag_disc_number)
    .bind(&track.tag_brainz_id)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Track", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Track", id))
}

/// Delete a track together with its genre links, stars and ratings
pub async fn delete(pool: &SqlitePool, id: TrackId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Track", id));
    }

    tx.commit().await?;
    tracing::debug!(id, "Track deleted");

    Ok(())
}
