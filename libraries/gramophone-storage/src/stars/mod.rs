//! Stars on albums, artists and tracks
//!
//! One table per target kind; the composite primary key makes starring the
//! same target twice keep a single row.

use crate::time::{now, to_datetime};
use gramophone_core::types::{AnnotationTarget, Star, UserId};
use gramophone_core::Result;
use sqlx::SqlitePool;

pub(crate) fn star_table(target: AnnotationTarget) -> (&'static str, &'static str) {
    match target {
        AnnotationTarget::Album(_) => ("album_stars", "album_id"),
        AnnotationTarget::Artist(_) => ("artist_stars", "artist_id"),
        AnnotationTarget::Track(_) => ("track_stars", "track_id"),
    }
}

/// Star a target, refreshing the star date if already starred
///
/// # Errors
///
/// [`gramophone_core::Error::ForeignKeyViolation`] if the user or target does
/// not exist
pub async fn star(pool: &SqlitePool, user_id: UserId, target: AnnotationTarget) -> Result<Star> {
    let (table, column) = star_table(target);
    let ts = now();

    sqlx::query(&format!(
        "INSERT INTO {table} (user_id, {column}, star_date) VALUES (?, ?, ?)
         ON CONFLICT(user_id, {column}) DO UPDATE SET star_date = excluded.star_date"
    ))
    .bind(user_id)
    .bind(target.id())
    .bind(ts)
    .execute(pool)
    .await?;

    tracing::debug!(user_id, target = %target.sid(), "Starred");

    Ok(Star {
        user_id,
        target,
        star_date: to_datetime(ts),
    })
}

/// Remove a star; returns whether one existed
pub async fn unstar(pool: &SqlitePool, user_id: UserId, target: AnnotationTarget) -> Result<bool> {
    let (table, column) = star_table(target);

    let result = sqlx::query(&format!("DELETE FROM {table} WHERE user_id = ? AND {column} = ?"))
        .bind(user_id)
        .bind(target.id())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get(pool: &SqlitePool, user_id: UserId, target: AnnotationTarget) -> Result<Option<Star>> {
    let (table, column) = star_table(target);

    let star_date = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT star_date FROM {table} WHERE user_id = ? AND {column} = ?"
    ))
    .bind(user_id)
    .bind(target.id())
    .fetch_optional(pool)
    .await?;

    Ok(star_date.map(|ts| Star {
        user_id,
        target,
        star_date: to_datetime(ts),
    }))
}

/// Number of stars on a target across all users
pub async fn count(pool: &SqlitePool, target: AnnotationTarget) -> Result<i64> {
    let (table, column) = star_table(target);

    let count = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {table} WHERE {column} = ?"
    ))
    .bind(target.id())
    .fetch_one(pool)
    .await?;

    Ok(count)
}
