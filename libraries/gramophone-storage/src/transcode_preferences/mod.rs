//! Per user, per client transcoding profile

use gramophone_core::types::{TranscodePreference, UserId};
use gramophone_core::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn map_preference(row: &SqliteRow) -> Result<TranscodePreference> {
    Ok(TranscodePreference {
        user_id: row.try_get("user_id")?,
        client: row.try_get("client")?,
        profile: row.try_get("profile")?,
    })
}

pub async fn get(pool: &SqlitePool, user_id: UserId, client: &str) -> Result<Option<TranscodePreference>> {
    let row = sqlx::query(
        "SELECT user_id, client, profile FROM transcode_preferences
         WHERE user_id = ? AND client = ?",
    )
    .bind(user_id)
    .bind(client)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_preference).transpose()
}

pub async fn get_all_for_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<TranscodePreference>> {
    let rows = sqlx::query(
        "SELECT user_id, client, profile FROM transcode_preferences
         WHERE user_id = ?
         ORDER BY client",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_preference).collect()
}

/// Set the profile for a client, replacing any previous one
pub async fn set(pool: &SqlitePool, user_id: UserId, client: &str, profile: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO transcode_preferences (user_id, client, profile)
         VALUES (?, ?, ?)
         ON CONFLICT(user_id, client) DO UPDATE SET profile = excluded.profile",
    )
    .bind(user_id)
    .bind(client)
    .bind(profile)
    .execute(pool)
    .await?;

    tracing::debug!(user_id, client, profile, "Transcode preference stored");

    Ok(())
}

/// Returns whether a preference was removed
pub async fn delete(pool: &SqlitePool, user_id: UserId, client: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM transcode_preferences WHERE user_id = ? AND client = ?")
        .bind(user_id)
        .bind(client)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
