//! Users
//!
//! A user owns plays, play queue, transcode preferences, bookmarks, stars and
//! ratings. All of those are removed by cascade when the user is deleted.
//! Averages over the removed ratings are refreshed in the same transaction.

use crate::aggregates;
use crate::time::{now, to_datetime};
use gramophone_core::types::{CreateUser, UpdateUser, User, UserId};
use gramophone_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_USER: &str = "SELECT id, created_at, name, password, lastfm_session,
        listenbrainz_url, listenbrainz_token, is_admin, avatar
     FROM users";

fn map_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        created_at: to_datetime(row.try_get("created_at")?),
        name: row.try_get("name")?,
        password: row.try_get("password")?,
        lastfm_session: row.try_get("lastfm_session")?,
        listenbrainz_url: row.try_get("listenbrainz_url")?,
        listenbrainz_token: row.try_get("listenbrainz_token")?,
        is_admin: row.try_get("is_admin")?,
        avatar: row.try_get("avatar")?,
    })
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("{SELECT_USER} ORDER BY name"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_user).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("{SELECT_USER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_user).transpose()
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("{SELECT_USER} WHERE name = ?"))
        .bind(name)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_user).transpose()
}

/// Create a user
///
/// # Errors
///
/// [`Error::UniqueViolation`] if the name is taken
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<User> {
    let result = sqlx::query(
        "INSERT INTO users (created_at, name, password, is_admin) VALUES (?, ?, ?, ?)",
    )
    .bind(now())
    .bind(&user.name)
    .bind(&user.password)
    .bind(user.is_admin)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::info!(id, name = %user.name, "User created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("User", id))
}

/// Update a user (only provided fields change)
pub async fn update(pool: &SqlitePool, id: UserId, user: UpdateUser) -> Result<User> {
    let result = sqlx::query(
        "UPDATE users
         SET name = COALESCE(?, name),
             password = COALESCE(?, password),
             listenbrainz_url = COALESCE(?, listenbrainz_url),
             listenbrainz_token = COALESCE(?, listenbrainz_token),
             is_admin = COALESCE(?, is_admin),
             avatar = COALESCE(?, avatar)
         WHERE id = ?",
    )
    .bind(&user.name)
    .bind(&user.password)
    .bind(&user.listenbrainz_url)
    .bind(&user.listenbrainz_token)
    .bind(user.is_admin)
    .bind(&user.avatar)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("User", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("User", id))
}

/// Store or clear the Last.fm session key obtained for this user
pub async fn set_lastfm_session(pool: &SqlitePool, id: UserId, session: Option<&str>) -> Result<()> {
    let result = sqlx::query("UPDATE users SET lastfm_session = ? WHERE id = ?")
        .bind(session)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("User", id));
    }

    tracing::debug!(id, linked = session.is_some(), "Last.fm session updated");

    Ok(())
}

/// Delete a user and everything the user owns
///
/// The cached average rating of everything the user rated is recomputed in
/// the same transaction.
pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let rated = aggregates::rated_by_user(&mut *tx, id).await?;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("User", id));
    }

    for target in &rated {
        aggregates::refresh_average_rating(&mut *tx, *target).await?;
    }

    tx.commit().await?;
    tracing::info!(id, refreshed = rated.len(), "User deleted");

    Ok(())
}
