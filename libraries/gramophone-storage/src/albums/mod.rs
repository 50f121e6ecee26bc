//! Albums (library directories)
//!
//! Albums form a forest through `parent_id`. Deleting an album removes its
//! whole subtree together with tracks, join rows, stars, ratings and plays.

use crate::time::{now, to_datetime};
use crate::{artists, genres};
use gramophone_core::normalize;
use gramophone_core::types::{Album, AlbumId, AlbumLocation, ArtistId, CreateAlbum, UpdateAlbum};
use gramophone_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashSet;

const SELECT_ALBUM: &str = "SELECT id, created_at, updated_at, modified_at, left_path, right_path,
        right_path_udec, parent_id, root_dir, cover, tag_title, tag_title_udec,
        tag_brainz_id, tag_year, average_rating
     FROM albums";

fn map_album(row: &SqliteRow) -> Result<Album> {
    Ok(Album {
        id: row.try_get("id")?,
        created_at: to_datetime(row.try_get("created_at")?),
        updated_at: to_datetime(row.try_get("updated_at")?),
        modified_at: to_datetime(row.try_get("modified_at")?),
        left_path: row.try_get("left_path")?,
        right_path: row.try_get("right_path")?,
        right_path_udec: row.try_get("right_path_udec")?,
        parent_id: row.try_get("parent_id")?,
        root_dir: row.try_get("root_dir")?,
        cover: row.try_get("cover")?,
        tag_title: row.try_get("tag_title")?,
        tag_title_udec: row.try_get("tag_title_udec")?,
        tag_brainz_id: row.try_get("tag_brainz_id")?,
        tag_year: row.try_get("tag_year")?,
        average_rating: row.try_get("average_rating")?,
        genres: Vec::new(),
        artists: Vec::new(),
    })
}

pub async fn get_by_id(pool: &SqlitePool, id: AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query(&format!("{SELECT_ALBUM} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_album).transpose()
}

/// Album with its genres and artists loaded
pub async fn get_with_relations(pool: &SqlitePool, id: AlbumId) -> Result<Album> {
    let mut album = get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Album", id))?;

    album.genres = genres::get_by_album(pool, id).await?;
    album.artists = artists::get_by_album(pool, id).await?;

    Ok(album)
}

/// Look an album up by its directory location
pub async fn find_by_path(pool: &SqlitePool, location: &AlbumLocation) -> Result<Option<Album>> {
    let row = sqlx::query(&format!(
        "{SELECT_ALBUM} WHERE left_path = ? AND right_path = ? AND root_dir = ?"
    ))
    .bind(&location.left_path)
    .bind(&location.right_path)
    .bind(&location.root_dir)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_album).transpose()
}

/// Direct children of an album, ordered by directory name
pub async fn get_children(pool: &SqlitePool, parent_id: AlbumId) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        "{SELECT_ALBUM} WHERE parent_id = ?
         ORDER BY COALESCE(right_path_udec, right_path) COLLATE NOCASE, id"
    ))
    .bind(parent_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_album).collect()
}

/// Albums without a parent (library roots)
pub async fn get_roots(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        "{SELECT_ALBUM} WHERE parent_id IS NULL ORDER BY root_dir, id"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_album).collect()
}

/// Create a new album
///
/// # Errors
///
/// * [`Error::UniqueViolation`] if an album already exists at the location
/// * [`Error::ForeignKeyViolation`] if `parent_id` does not exist
pub async fn create(pool: &SqlitePool, album: CreateAlbum) -> Result<Album> {
    let ts = now();
    let right_path_udec = normalize::fold(&album.right_path);
    let tag_title_udec = album.tag_title.as_deref().and_then(normalize::fold);

    let result = sqlx::query(
        "INSERT INTO albums (
            created_at, updated_at, modified_at, left_path, right_path, right_path_udec,
            parent_id, root_dir, cover, tag_title, tag_title_udec, tag_brainz_id, tag_year
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(ts)
    .bind(ts)
    .bind(ts)
    .bind(&album.left_path)
    .bind(&album.right_path)
    .bind(&right_path_udec)
    .bind(album.parent_id)
    .bind(&album.root_dir)
    .bind(&album.cover)
    .bind(&album.tag_title)
    .bind(&tag_title_udec)
    .bind(&album.tag_brainz_id)
    .bind(album.tag_year)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!(id, right_path = %album.right_path, "Album created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Album", id))
}

/// Update album tags (only provided fields change)
pub async fn update(pool: &SqlitePool, id: AlbumId, album: UpdateAlbum) -> Result<Album> {
    let tag_title_udec = album.tag_title.as_deref().and_then(normalize::fold);

    let result = sqlx::query(
        "UPDATE albums
         SET cover = COALESCE(?, cover),
             tag_title_udec = CASE WHEN ? IS NOT NULL THEN ? ELSE tag_title_udec END,
             tag_title = COALESCE(?, tag_title),
             tag_brainz_id = COALESCE(?, tag_brainz_id),
             tag_year = COALESCE(?, tag_year),
             updated_at = ?
         WHERE id = ?",
    )
    .bind(&album.cover)
    .bind(&album.tag_title)
    .bind(&tag_title_udec)
    .bind(&album.tag_title)
    .bind(&album.tag_brainz_id)
    .bind(album.tag_year)
    .bind(now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Album", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Album", id))
}

/// Move an album under a new parent, or make it a root with `None`
///
/// # Errors
///
/// [`Error::ConstraintViolation`] if the move would make the album its own
/// ancestor
pub async fn set_parent(pool: &SqlitePool, id: AlbumId, parent_id: Option<AlbumId>) -> Result<()> {
    let mut tx = pool.begin().await?;

    if let Some(parent_id) = parent_id {
        ensure_not_ancestor(&mut *tx, id, parent_id).await?;
    }

    let result = sqlx::query("UPDATE albums SET parent_id = ?, updated_at = ? WHERE id = ?")
        .bind(parent_id)
        .bind(now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Album", id));
    }

    tx.commit().await?;
    tracing::debug!(id, ?parent_id, "Album parent changed");

    Ok(())
}

// Walks up from `parent_id`; reaching `id` means the new edge closes a cycle.
async fn ensure_not_ancestor(
    conn: &mut SqliteConnection,
    id: AlbumId,
    parent_id: AlbumId,
) -> Result<()> {
    let mut seen = HashSet::new();
    let mut cursor = Some(parent_id);

    while let Some(current) = cursor {
        if current == id {
            return Err(Error::constraint(format!(
                "album {id} cannot be a descendant of itself"
            )));
        }
        if !seen.insert(current) {
            break;
        }

        cursor = sqlx::query_scalar::<_, Option<i64>>("SELECT parent_id FROM albums WHERE id = ?")
            .bind(current)
            .fetch_optional(&mut *conn)
            .await?
            .flatten();
    }

    Ok(())
}

/// Link an artist to an album; linking twice is a no-op
pub async fn link_artist(pool: &SqlitePool, album_id: AlbumId, artist_id: ArtistId) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO album_artists (album_id, artist_id) VALUES (?, ?)")
        .bind(album_id)
        .bind(artist_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn unlink_artist(pool: &SqlitePool, album_id: AlbumId, artist_id: ArtistId) -> Result<()> {
    sqlx::query("DELETE FROM album_artists WHERE album_id = ? AND artist_id = ?")
        .bind(album_id)
        .bind(artist_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete an album and everything that depends on it
pub async fn delete(pool: &SqlitePool, id: AlbumId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Album", id));
    }

    tx.commit().await?;
    tracing::info!(id, "Album deleted");

    Ok(())
}
