//! Resume positions, one per (user, entry)
//!
//! The entry is stored as its kind name plus numeric id so that any
//! playable kind can be bookmarked without a foreign key per kind.

use crate::time::{now, to_datetime};
use gramophone_core::types::{Bookmark, UserId};
use gramophone_core::{Error, Result, SpecId, SpecKind};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn map_bookmark(row: &SqliteRow) -> Result<Bookmark> {
    let kind: String = row.try_get("entry_id_type")?;
    let kind = SpecKind::from_name(&kind)
        .ok_or_else(|| Error::Database(format!("unknown bookmark entry type {kind:?}")))?;

    Ok(Bookmark {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        position: row.try_get("position")?,
        comment: row.try_get("comment")?,
        entry: SpecId::new(kind, row.try_get("entry_id")?),
        created_at: to_datetime(row.try_get("created_at")?),
        updated_at: to_datetime(row.try_get("updated_at")?),
    })
}

pub async fn get_by_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Bookmark>> {
    let rows = sqlx::query(
        "SELECT id, user_id, position, comment, entry_id_type, entry_id, created_at, updated_at
         FROM bookmarks
         WHERE user_id = ?
         ORDER BY updated_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_bookmark).collect()
}

/// Create or move the user's bookmark on `entry`
pub async fn save(
    pool: &SqlitePool,
    user_id: UserId,
    entry: SpecId,
    position: i64,
    comment: &str,
) -> Result<Bookmark> {
    let ts = now();

    let row = sqlx::query(
        "INSERT INTO bookmarks (user_id, position, comment, entry_id_type, entry_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id, entry_id_type, entry_id) DO UPDATE
         SET position = excluded.position,
             comment = excluded.comment,
             updated_at = excluded.updated_at
         RETURNING id, user_id, position, comment, entry_id_type, entry_id, created_at, updated_at",
    )
    .bind(user_id)
    .bind(position)
    .bind(comment)
    .bind(entry.kind.as_str())
    .bind(entry.value)
    .bind(ts)
    .bind(ts)
    .fetch_one(pool)
    .await?;

    map_bookmark(&row)
}

/// Returns whether a bookmark was removed
pub async fn delete(pool: &SqlitePool, user_id: UserId, entry: SpecId) -> Result<bool> {
    let result = sqlx::query(
        "DELETE FROM bookmarks WHERE user_id = ? AND entry_id_type = ? AND entry_id = ?",
    )
    .bind(user_id)
    .bind(entry.kind.as_str())
    .bind(entry.value)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
