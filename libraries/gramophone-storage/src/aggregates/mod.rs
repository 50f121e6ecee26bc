//! Derived fields
//!
//! `average_rating` is cached on the target row and kept current by the
//! rating writes. Counts and durations are computed on read.

use crate::ratings::rating_table;
use gramophone_core::types::{AlbumId, AlbumStats, AnnotationTarget, ArtistId, Genre, GenreCounts, UserId};
use gramophone_core::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

const RATED_TARGETS: [AnnotationTarget; 3] = [
    AnnotationTarget::Album(0),
    AnnotationTarget::Artist(0),
    AnnotationTarget::Track(0),
];

fn entity_table(target: AnnotationTarget) -> &'static str {
    match target {
        AnnotationTarget::Album(_) => "albums",
        AnnotationTarget::Artist(_) => "artists",
        AnnotationTarget::Track(_) => "tracks",
    }
}

/// Recompute one target's mean rating; NULL when it has no ratings left
pub async fn refresh_average_rating(conn: &mut SqliteConnection, target: AnnotationTarget) -> Result<()> {
    let (ratings, column) = rating_table(target);
    let table = entity_table(target);

    sqlx::query(&format!(
        "UPDATE {table}
         SET average_rating = (SELECT AVG(rating) FROM {ratings} WHERE {column} = ?)
         WHERE id = ?"
    ))
    .bind(target.id())
    .bind(target.id())
    .execute(conn)
    .await?;

    Ok(())
}

fn with_id(target: AnnotationTarget, id: i64) -> AnnotationTarget {
    match target {
        AnnotationTarget::Album(_) => AnnotationTarget::Album(id),
        AnnotationTarget::Artist(_) => AnnotationTarget::Artist(id),
        AnnotationTarget::Track(_) => AnnotationTarget::Track(id),
    }
}

/// Every target `user_id` has a rating on
pub(crate) async fn rated_by_user(conn: &mut SqliteConnection, user_id: UserId) -> Result<Vec<AnnotationTarget>> {
    let mut targets = Vec::new();

    for kind in RATED_TARGETS {
        let (ratings, column) = rating_table(kind);
        let ids = sqlx::query_scalar::<_, i64>(&format!("SELECT {column} FROM {ratings} WHERE user_id = ?"))
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;

        targets.extend(ids.into_iter().map(|id| with_id(kind, id)));
    }

    Ok(targets)
}

/// Recompute every cached mean rating from the rating rows
pub async fn refresh_all_average_ratings(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    for target in RATED_TARGETS {
        let (ratings, column) = rating_table(target);
        let table = entity_table(target);

        let result = sqlx::query(&format!(
            "UPDATE {table}
             SET average_rating = (SELECT AVG(r.rating) FROM {ratings} r WHERE r.{column} = {table}.id)"
        ))
        .execute(&mut *tx)
        .await?;

        tracing::debug!(table, rows = result.rows_affected(), "Average ratings refreshed");
    }

    tx.commit().await?;
    tracing::info!("All average ratings refreshed");

    Ok(())
}

/// Number of direct child albums
pub async fn album_child_count(pool: &SqlitePool, album_id: AlbumId) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM albums WHERE parent_id = ?")
        .bind(album_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn album_track_count(pool: &SqlitePool, album_id: AlbumId) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tracks WHERE album_id = ?")
        .bind(album_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Sum of track lengths in seconds, 0 for an empty album
pub async fn album_duration(pool: &SqlitePool, album_id: AlbumId) -> Result<i64> {
    let duration = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(length), 0) FROM tracks WHERE album_id = ?",
    )
    .bind(album_id)
    .fetch_one(pool)
    .await?;

    Ok(duration)
}

pub async fn album_stats(pool: &SqlitePool, album_id: AlbumId) -> Result<AlbumStats> {
    let row = sqlx::query(
        "SELECT
            (SELECT COUNT(*) FROM albums WHERE parent_id = ?1) AS child_count,
            (SELECT COUNT(*) FROM tracks WHERE album_id = ?1) AS track_count,
            (SELECT COALESCE(SUM(length), 0) FROM tracks WHERE album_id = ?1) AS duration",
    )
    .bind(album_id)
    .fetch_one(pool)
    .await?;

    Ok(AlbumStats {
        child_count: row.try_get("child_count")?,
        track_count: row.try_get("track_count")?,
        duration: row.try_get("duration")?,
    })
}

fn map_genre_counts(row: &SqliteRow) -> Result<GenreCounts> {
    Ok(GenreCounts {
        genre: Genre {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        },
        album_count: row.try_get("album_count")?,
        track_count: row.try_get("track_count")?,
    })
}

/// Album and track counts of every genre, ordered by name
pub async fn genre_counts(pool: &SqlitePool) -> Result<Vec<GenreCounts>> {
    let rows = sqlx::query(
        "SELECT g.id, g.name,
            (SELECT COUNT(*) FROM album_genres ag WHERE ag.genre_id = g.id) AS album_count,
            (SELECT COUNT(*) FROM track_genres tg WHERE tg.genre_id = g.id) AS track_count
         FROM genres g
         ORDER BY g.name",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_genre_counts).collect()
}

pub async fn artist_album_count(pool: &SqlitePool, artist_id: ArtistId) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM album_artists WHERE artist_id = ?")
        .bind(artist_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
