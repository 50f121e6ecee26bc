//! gramophone storage
//!
//! `SQLite` persistence for the gramophone entity graph.
//!
//! Each module owns the queries of one entity (vertical slices). Referential
//! integrity is enforced by the schema: foreign keys with `ON DELETE CASCADE`
//! and unique indexes on natural keys and join rows. Every multi-statement
//! mutation runs in a single transaction so a cascade is applied completely
//! or not at all.
//!
//! # Example
//!
//! ```rust,no_run
//! use gramophone_storage::{create_pool, run_migrations, settings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://gramophone.db").await?;
//! run_migrations(&pool).await?;
//!
//! settings::set_setting(&pool, settings::SETTING_LASTFM_API_KEY, "key").await?;
//! let key = settings::get_setting(&pool, settings::SETTING_LASTFM_API_KEY).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod context;
mod time;

// Library graph
pub mod albums;
pub mod artists;
pub mod genres;
pub mod tracks;

// Users and user owned state
pub mod bookmarks;
pub mod play_queues;
pub mod plays;
pub mod transcode_preferences;
pub mod users;

// Annotations and derived fields
pub mod aggregates;
pub mod ratings;
pub mod stars;

// Standalone entities
pub mod podcasts;
pub mod radio_stations;
pub mod settings;

pub use config::PoolSettings;
pub use context::LocalStorageContext;
pub use gramophone_core::{Error, Result};

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before handing the pool to request handlers.
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool with default [`PoolSettings`]
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://gramophone.db>`)
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    create_pool_with(&PoolSettings {
        url: database_url.to_owned(),
        ..PoolSettings::default()
    })
    .await
}

/// Create a new `SQLite` pool
///
/// Foreign keys are always enforced: cascades are part of the schema
/// contract, not an optional optimisation.
pub async fn create_pool_with(settings: &PoolSettings) -> std::result::Result<SqlitePool, sqlx::Error> {
    tracing::debug!(url = %settings.url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(&settings.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(settings.busy_timeout_secs));

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(
        url = %settings.url,
        max_connections = settings.max_connections,
        "SQLite pool ready"
    );

    Ok(pool)
}
