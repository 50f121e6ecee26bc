use gramophone_core::types::{AlbumId, Genre, GenreId, TrackId};
use gramophone_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn map_genre(row: &SqliteRow) -> Result<Genre> {
    Ok(Genre {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Genre>> {
    let rows = sqlx::query("SELECT id, name FROM genres ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_genre).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: GenreId) -> Result<Option<Genre>> {
    let row = sqlx::query("SELECT id, name FROM genres WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_genre).transpose()
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Genre>> {
    let row = sqlx::query("SELECT id, name FROM genres WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_genre).transpose()
}

/// Create a genre
///
/// # Errors
///
/// [`Error::UniqueViolation`] if the name is taken
pub async fn create(pool: &SqlitePool, name: &str) -> Result<Genre> {
    let result = sqlx::query("INSERT INTO genres (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    Ok(Genre {
        id: result.last_insert_rowid(),
        name: name.to_owned(),
    })
}

/// Find a genre by exact name or create it
pub async fn get_or_create(pool: &SqlitePool, name: &str) -> Result<Genre> {
    sqlx::query("INSERT INTO genres (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    find_by_name(pool, name)
        .await?
        .ok_or_else(|| Error::not_found("Genre", name))
}

/// Genres of an album, in join row order
pub async fn get_by_album(pool: &SqlitePool, album_id: AlbumId) -> Result<Vec<Genre>> {
    let rows = sqlx::query(
        "SELECT g.id, g.name
         FROM genres g
         INNER JOIN album_genres ag ON ag.genre_id = g.id
         WHERE ag.album_id = ?
         ORDER BY ag.rowid",
    )
    .bind(album_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_genre).collect()
}

/// Genres of a track, in join row order
pub async fn get_by_track(pool: &SqlitePool, track_id: TrackId) -> Result<Vec<Genre>> {
    let rows = sqlx::query(
        "SELECT g.id, g.name
         FROM genres g
         INNER JOIN track_genres tg ON tg.genre_id = g.id
         WHERE tg.track_id = ?
         ORDER BY tg.rowid",
    )
    .bind(track_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_genre).collect()
}

/// Link a genre to an album; linking twice is a no-op
pub async fn add_to_album(pool: &SqlitePool, album_id: AlbumId, genre_id: GenreId) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO album_genres (album_id, genre_id) VALUES (?, ?)")
        .bind(album_id)
        .bind(genre_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Link a genre to a track; linking twice is a no-op
pub async fn add_to_track(pool: &SqlitePool, track_id: TrackId, genre_id: GenreId) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO track_genres (track_id, genre_id) VALUES (?, ?)")
        .bind(track_id)
        .bind(genre_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn remove_from_album(pool: &SqlitePool, album_id: AlbumId, genre_id: GenreId) -> Result<()> {
    sqlx::query("DELETE FROM album_genres WHERE album_id = ? AND genre_id = ?")
        .bind(album_id)
        .bind(genre_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn remove_from_track(pool: &SqlitePool, track_id: TrackId, genre_id: GenreId) -> Result<()> {
    sqlx::query("DELETE FROM track_genres WHERE track_id = ? AND genre_id = ?")
        .bind(track_id)
        .bind(genre_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete a genre and its album/track links
pub async fn delete(pool: &SqlitePool, id: GenreId) -> Result<()> {
    let result = sqlx::query("DELETE FROM genres WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Genre", id));
    }

    Ok(())
}
