use gramophone_core::normalize;
use gramophone_core::types::{AlbumId, Artist, ArtistId, CreateArtist};
use gramophone_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_ARTIST: &str = "SELECT ar.id, ar.name, ar.name_udec, ar.average_rating FROM artists ar";

pub(crate) fn map_artist(row: &SqliteRow) -> Result<Artist> {
    Ok(Artist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        name_udec: row.try_get("name_udec")?,
        average_rating: row.try_get("average_rating")?,
    })
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Artist>> {
    let rows = sqlx::query(&format!(
        "{SELECT_ARTIST} ORDER BY COALESCE(ar.name_udec, ar.name) COLLATE NOCASE, ar.id"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_artist).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: ArtistId) -> Result<Option<Artist>> {
    let row = sqlx::query(&format!("{SELECT_ARTIST} WHERE ar.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_artist).transpose()
}

/// Exact, case-sensitive lookup
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Artist>> {
    let row = sqlx::query(&format!("{SELECT_ARTIST} WHERE ar.name = ?"))
        .bind(name)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_artist).transpose()
}

/// Artists linked to an album, in join row order
pub async fn get_by_album(pool: &SqlitePool, album_id: AlbumId) -> Result<Vec<Artist>> {
    let rows = sqlx::query(&format!(
        "{SELECT_ARTIST}
         INNER JOIN album_artists aa ON aa.artist_id = ar.id
         WHERE aa.album_id = ?"
    ))
    .bind(album_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_artist).collect()
}

/// Create a new artist
///
/// # Errors
///
/// [`Error::UniqueViolation`] if an artist with the same name exists
pub async fn create(pool: &SqlitePool, artist: CreateArtist) -> Result<Artist> {
    let name_udec = normalize::fold(&artist.name);

    let result = sqlx::query("INSERT INTO artists (name, name_udec) VALUES (?, ?)")
        .bind(&artist.name)
        .bind(&name_udec)
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();
    tracing::debug!(id, name = %artist.name, "Artist created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| Error::not_found("Artist", id))
}

/// Fetch the artist with this name, creating it first if needed
pub async fn get_or_create(pool: &SqlitePool, name: &str) -> Result<Artist> {
    let name_udec = normalize::fold(name);

    sqlx::query(
        "INSERT INTO artists (name, name_udec) VALUES (?, ?)
         ON CONFLICT(name) DO NOTHING",
    )
    .bind(name)
    .bind(&name_udec)
    .execute(pool)
    .await?;

    find_by_name(pool, name)
        .await?
        .ok_or_else(|| Error::not_found("Artist", name))
}

/// Delete an artist together with its album links, stars and ratings
pub async fn delete(pool: &SqlitePool, id: ArtistId) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("Artist", id));
    }

    tx.commit().await?;
    tracing::info!(id, "Artist deleted");

    Ok(())
}
