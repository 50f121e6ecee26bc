//! Saved play queues, at most one per user
//!
//! Saving overwrites the previous queue wholesale; concurrent writers are not
//! merged.

use crate::time::{now, to_datetime};
use gramophone_core::types::{join_ids, PlayQueue, UserId};
use gramophone_core::{Error, Result, SpecId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_QUEUE: &str = "SELECT id, created_at, updated_at, user_id, current, position,
        changed_by, items
     FROM play_queues";

fn map_play_queue(row: &SqliteRow) -> Result<PlayQueue> {
    Ok(PlayQueue {
        id: row.try_get("id")?,
        created_at: to_datetime(row.try_get("created_at")?),
        updated_at: to_datetime(row.try_get("updated_at")?),
        user_id: row.try_get("user_id")?,
        current: row.try_get("current")?,
        position: row.try_get("position")?,
        changed_by: row.try_get("changed_by")?,
        items: row.try_get("items")?,
    })
}

/// Get the user's queue
///
/// # Errors
///
/// [`Error::NotFound`] if the user never saved a queue
pub async fn get(pool: &SqlitePool, user_id: UserId) -> Result<PlayQueue> {
    find(pool, user_id)
        .await?
        .ok_or_else(|| Error::not_found("PlayQueue", user_id))
}

pub async fn find(pool: &SqlitePool, user_id: UserId) -> Result<Option<PlayQueue>> {
    let row = sqlx::query(&format!("{SELECT_QUEUE} WHERE user_id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_play_queue).transpose()
}

/// Replace the user's queue
///
/// # Errors
///
/// [`Error::ForeignKeyViolation`] if the user does not exist
pub async fn save(
    pool: &SqlitePool,
    user_id: UserId,
    items: &[SpecId],
    current: Option<SpecId>,
    position: i64,
    changed_by: &str,
) -> Result<PlayQueue> {
    let ts = now();
    let current = current.map(|sid| sid.encode()).unwrap_or_default();

    let row = sqlx::query(
        "INSERT INTO play_queues (created_at, updated_at, user_id, current, position, changed_by, items)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE
         SET updated_at = excluded.updated_at,
             current = excluded.current,
             position = excluded.position,
             changed_by = excluded.changed_by,
             items = excluded.items
         RETURNING id, created_at, updated_at, user_id, current, position, changed_by, items",
    )
    .bind(ts)
    .bind(ts)
    .bind(user_id)
    .bind(&current)
    .bind(position)
    .bind(changed_by)
    .bind(join_ids(items))
    .fetch_one(pool)
    .await?;

    tracing::debug!(user_id, items = items.len(), changed_by, "Play queue saved");

    map_play_queue(&row)
}

/// Delete the user's queue; returns whether one existed
pub async fn delete(pool: &SqlitePool, user_id: UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM play_queues WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
