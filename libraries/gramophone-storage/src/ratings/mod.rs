//! User ratings on albums, artists and tracks
//!
//! Every rating write recomputes the target's `average_rating` in the same
//! transaction, so the cached mean never disagrees with the rating rows.

use crate::aggregates;
use gramophone_core::types::{AnnotationTarget, Rating, UserId, UserRating};
use gramophone_core::{Error, Result};
use sqlx::SqlitePool;

pub(crate) fn rating_table(target: AnnotationTarget) -> (&'static str, &'static str) {
    match target {
        AnnotationTarget::Album(_) => ("album_ratings", "album_id"),
        AnnotationTarget::Artist(_) => ("artist_ratings", "artist_id"),
        AnnotationTarget::Track(_) => ("track_ratings", "track_id"),
    }
}

/// Set the user's rating of a target
///
/// # Errors
///
/// * [`Error::ConstraintViolation`] if `rating` is outside 1..=5
/// * [`Error::ForeignKeyViolation`] if the user or target does not exist
pub async fn set(pool: &SqlitePool, user_id: UserId, target: AnnotationTarget, rating: i64) -> Result<UserRating> {
    let rating = Rating::new(rating)?;
    let (table, column) = rating_table(target);

    let mut tx = pool.begin().await?;

    sqlx::query(&format!(
        "INSERT INTO {table} (user_id, {column}, rating) VALUES (?, ?, ?)
         ON CONFLICT(user_id, {column}) DO UPDATE SET rating = excluded.rating"
    ))
    .bind(user_id)
    .bind(target.id())
    .bind(i64::from(rating.get()))
    .execute(&mut *tx)
    .await?;

    aggregates::refresh_average_rating(&mut *tx, target).await?;

    tx.commit().await?;
    tracing::debug!(user_id, target = %target.sid(), rating = rating.get(), "Rated");

    Ok(UserRating {
        user_id,
        target,
        rating,
    })
}

/// Remove the user's rating; returns whether one existed
pub async fn clear(pool: &SqlitePool, user_id: UserId, target: AnnotationTarget) -> Result<bool> {
    let (table, column) = rating_table(target);

    let mut tx = pool.begin().await?;

    let result = sqlx::query(&format!("DELETE FROM {table} WHERE user_id = ? AND {column} = ?"))
        .bind(user_id)
        .bind(target.id())
        .execute(&mut *tx)
        .await?;

    aggregates::refresh_average_rating(&mut *tx, target).await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get(pool: &SqlitePool, user_id: UserId, target: AnnotationTarget) -> Result<Option<UserRating>> {
    let (table, column) = rating_table(target);

    let value = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT rating FROM {table} WHERE user_id = ? AND {column} = ?"
    ))
    .bind(user_id)
    .bind(target.id())
    .fetch_optional(pool)
    .await?;

    value
        .map(|value| {
            Rating::new(value)
                .map(|rating| UserRating {
                    user_id,
                    target,
                    rating,
                })
                .map_err(|_| Error::Database(format!("stored rating {value} out of range")))
        })
        .transpose()
}
