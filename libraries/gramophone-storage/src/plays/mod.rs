//! Per user, per album play counters

use crate::time::{now, to_datetime};
use gramophone_core::types::{AlbumId, Play, UserId};
use gramophone_core::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn map_play(row: &SqliteRow) -> Result<Play> {
    Ok(Play {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        album_id: row.try_get("album_id")?,
        time: to_datetime(row.try_get("time")?),
        count: row.try_get("count")?,
        length: row.try_get("length")?,
    })
}

/// Count one play of `length` seconds from an album
///
/// Creates the counter row on first play.
pub async fn record(pool: &SqlitePool, user_id: UserId, album_id: AlbumId, length: i64) -> Result<Play> {
    let row = sqlx::query(
        "INSERT INTO plays (user_id, album_id, time, count, length)
         VALUES (?, ?, ?, 1, ?)
         ON CONFLICT(user_id, album_id) DO UPDATE
         SET count = count + 1,
             length = length + excluded.length,
             time = excluded.time
         RETURNING id, user_id, album_id, time, count, length",
    )
    .bind(user_id)
    .bind(album_id)
    .bind(now())
    .bind(length)
    .fetch_one(pool)
    .await?;

    map_play(&row)
}

/// Plays of a user, most recent first
pub async fn get_by_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Play>> {
    let rows = sqlx::query(
        "SELECT id, user_id, album_id, time, count, length
         FROM plays
         WHERE user_id = ?
         ORDER BY time DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_play).collect()
}

pub async fn get(pool: &SqlitePool, user_id: UserId, album_id: AlbumId) -> Result<Option<Play>> {
    let row = sqlx::query(
        "SELECT id, user_id, album_id, time, count, length
         FROM plays
         WHERE user_id = ? AND album_id = ?",
    )
    .bind(user_id)
    .bind(album_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_play).transpose()
}
