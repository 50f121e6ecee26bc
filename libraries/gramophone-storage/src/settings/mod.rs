//! Global settings
//!
//! Plain key/value rows. Writes are upserts keyed by `key`, so repeating a
//! write is harmless and never creates a second row.
//!
//! # Example
//!
//! ```rust,no_run
//! use gramophone_storage::settings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! settings::set_setting(pool, settings::SETTING_LAST_SCAN_TIME, "1700000000").await?;
//! let last_scan = settings::get_setting(pool, settings::SETTING_LAST_SCAN_TIME).await?;
//! # Ok(())
//! # }
//! ```

use gramophone_core::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

// Setting key constants
/// Last.fm API key shared by all users
pub const SETTING_LASTFM_API_KEY: &str = "lastfm_api_key";

/// Last.fm shared secret used to sign requests
pub const SETTING_LASTFM_SECRET: &str = "lastfm_secret";

/// Unix timestamp of the last completed library scan
pub const SETTING_LAST_SCAN_TIME: &str = "last_scan_time";

/// Setting entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Get a single setting value
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the key was never set
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<String> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(row.try_get("value")?),
        None => Err(Error::not_found("Setting", key)),
    }
}

/// Get a setting, `None` if it was never set
pub async fn find_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    match get_setting(pool, key).await {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Insert or replace a setting value
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (key, value)
         VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    tracing::debug!(key, "Setting stored");

    Ok(())
}

/// Get all settings, ordered by key
pub async fn get_all_settings(pool: &SqlitePool) -> Result<Vec<Setting>> {
    let rows = sqlx::query("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_setting).collect()
}

fn map_setting(row: &SqliteRow) -> Result<Setting> {
    Ok(Setting {
        key: row.try_get("key")?,
        value: row.try_get("value")?,
    })
}

/// Delete a setting
///
/// Returns `Ok(true)` if a setting was deleted, `Ok(false)` if the key was not set
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
