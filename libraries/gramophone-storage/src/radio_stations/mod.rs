use gramophone_core::types::{CreateInternetRadioStation, InternetRadioStation, InternetRadioStationId};
use gramophone_core::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn map_station(row: &SqliteRow) -> Result<InternetRadioStation> {
    Ok(InternetRadioStation {
        id: row.try_get("id")?,
        stream_url: row.try_get("stream_url")?,
        name: row.try_get("name")?,
        homepage_url: row.try_get("homepage_url")?,
    })
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<InternetRadioStation>> {
    let rows = sqlx::query(
        "SELECT id, stream_url, name, homepage_url FROM internet_radio_stations ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_station).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: InternetRadioStationId) -> Result<Option<InternetRadioStation>> {
    let row = sqlx::query(
        "SELECT id, stream_url, name, homepage_url FROM internet_radio_stations WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_station).transpose()
}

pub async fn create(pool: &SqlitePool, station: CreateInternetRadioStation) -> Result<InternetRadioStation> {
    let result = sqlx::query(
        "INSERT INTO internet_radio_stations (stream_url, name, homepage_url) VALUES (?, ?, ?)",
    )
    .bind(&station.stream_url)
    .bind(&station.name)
    .bind(&station.homepage_url)
    .execute(pool)
    .await?;

    Ok(InternetRadioStation {
        id: result.last_insert_rowid(),
        stream_url: station.stream_url,
        name: station.name,
        homepage_url: station.homepage_url,
    })
}

/// Replace every field of a station
pub async fn update(pool: &SqlitePool, station: &InternetRadioStation) -> Result<()> {
    let result = sqlx::query(
        "UPDATE internet_radio_stations SET stream_url = ?, name = ?, homepage_url = ? WHERE id = ?",
    )
    .bind(&station.stream_url)
    .bind(&station.name)
    .bind(&station.homepage_url)
    .bind(station.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("InternetRadioStation", station.id));
    }

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: InternetRadioStationId) -> Result<()> {
    let result = sqlx::query("DELETE FROM internet_radio_stations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::not_found("InternetRadioStation", id));
    }

    Ok(())
}
