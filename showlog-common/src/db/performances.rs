//! Record store operations on the `performances` table
//!
//! Every write is a single statement, so a create or update either lands
//! completely or not at all.

use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::models::{ColumnInfo, PerformanceInput, PerformanceRecord};
use crate::Result;

const SELECT_COLUMNS: &str =
    "SELECT id, artist, type, province, city, venue, notes, date, poster, created_at FROM performances";

fn date_param(input: &PerformanceInput) -> Option<String> {
    input.date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Insert a new performance, returning the id assigned by the store
pub async fn insert_performance(pool: &SqlitePool, input: &PerformanceInput) -> Result<i64> {
    input.validate()?;

    let result = sqlx::query(
        "INSERT INTO performances (artist, type, province, city, venue, notes, date, poster)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&input.artist)
    .bind(&input.kind)
    .bind(&input.province)
    .bind(&input.city)
    .bind(&input.venue)
    .bind(&input.notes)
    .bind(date_param(input))
    .bind(&input.poster)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    info!("Inserted performance {} ({} / {})", id, input.artist, input.province);
    Ok(id)
}

/// All performances, newest entry first
pub async fn list_performances(pool: &SqlitePool) -> Result<Vec<PerformanceRecord>> {
    let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
        .fetch_all(pool)
        .await?;

    let records = rows
        .iter()
        .map(PerformanceRecord::from_row)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!("Loaded {} performances", records.len());
    Ok(records)
}

/// Performances whose stored province equals `province` exactly
pub async fn performances_by_province(
    pool: &SqlitePool,
    province: &str,
) -> Result<Vec<PerformanceRecord>> {
    let rows = sqlx::query(&format!(
        "{} WHERE province = ? ORDER BY created_at DESC, id DESC",
        SELECT_COLUMNS
    ))
    .bind(province)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(PerformanceRecord::from_row)
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Performances by `artist`, most recent performance date first
pub async fn performances_by_artist(
    pool: &SqlitePool,
    artist: &str,
) -> Result<Vec<PerformanceRecord>> {
    let rows = sqlx::query(&format!(
        "{} WHERE artist = ? ORDER BY date DESC, id DESC",
        SELECT_COLUMNS
    ))
    .bind(artist)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(PerformanceRecord::from_row)
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Replace the fields of performance `id`.
///
/// Text fields are all overwritten (absent optionals become NULL). The poster
/// is only touched when `input.poster` is set. Returns `false` if `id` does
/// not exist.
pub async fn update_performance(
    pool: &SqlitePool,
    id: i64,
    input: &PerformanceInput,
) -> Result<bool> {
    input.validate()?;

    let sql = if input.poster.is_some() {
        "UPDATE performances
         SET artist = ?, type = ?, province = ?, city = ?, venue = ?, notes = ?, date = ?, poster = ?
         WHERE id = ?"
    } else {
        "UPDATE performances
         SET artist = ?, type = ?, province = ?, city = ?, venue = ?, notes = ?, date = ?
         WHERE id = ?"
    };

    let mut query = sqlx::query(sql)
        .bind(&input.artist)
        .bind(&input.kind)
        .bind(&input.province)
        .bind(&input.city)
        .bind(&input.venue)
        .bind(&input.notes)
        .bind(date_param(input));
    if let Some(poster) = &input.poster {
        query = query.bind(poster);
    }

    let result = query.bind(id).execute(pool).await?;
    let updated = result.rows_affected() > 0;
    if updated {
        info!("Updated performance {}", id);
    }
    Ok(updated)
}

/// Delete performance `id`. Returns `false` if it did not exist.
pub async fn delete_performance(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM performances WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        info!("Deleted performance {}", id);
    }
    Ok(deleted)
}

/// Fetch a single performance by id
pub async fn get_performance(pool: &SqlitePool, id: i64) -> Result<Option<PerformanceRecord>> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(PerformanceRecord::from_row).transpose()?)
}

/// Distinct artist names in ascending order
pub async fn list_artists(pool: &SqlitePool) -> Result<Vec<String>> {
    let artists = sqlx::query_scalar("SELECT DISTINCT artist FROM performances ORDER BY artist")
        .fetch_all(pool)
        .await?;
    Ok(artists)
}

/// Column layout of the `performances` table
pub async fn table_columns(pool: &SqlitePool) -> Result<Vec<ColumnInfo>> {
    // PRAGMA table_info returns: (cid, name, type, notnull, dflt_value, pk)
    let rows = sqlx::query("PRAGMA table_info(performances)")
        .fetch_all(pool)
        .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        columns.push(ColumnInfo {
            name: row.try_get(1)?,
            column_type: row.try_get(2)?,
            not_null: row.try_get::<i64, _>(3)? != 0,
            default_value: row.try_get(4)?,
            primary_key: row.try_get::<i64, _>(5)? != 0,
        });
    }
    Ok(columns)
}

/// Round-trip a trivial query to confirm the pool is usable
pub async fn ping(pool: &SqlitePool) -> Result<i64> {
    let value: i64 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;
    Ok(value)
}
