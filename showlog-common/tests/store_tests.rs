//! Record store tests against a throwaway SQLite file

use chrono::NaiveDate;
use showlog_common::db::{self, init::init_database, PerformanceInput};
use showlog_common::stats::{Dashboard, MonthLocale};
use showlog_common::Error;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("nested").join("showlog.db"))
        .await
        .unwrap();
    (dir, pool)
}

fn input(artist: &str, province: &str, date: Option<&str>) -> PerformanceInput {
    PerformanceInput {
        artist: artist.to_string(),
        kind: "concert".to_string(),
        province: province.to_string(),
        venue: Some("Livehouse".to_string()),
        date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_database_created_and_reopened() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("showlog.db");

    let pool = init_database(&path).await.unwrap();
    db::insert_performance(&pool, &input("A", "广东省", None)).await.unwrap();
    pool.close().await;
    assert!(path.exists());

    // Reopening keeps the data and does not fail on the existing table
    let pool = init_database(&path).await.unwrap();
    assert_eq!(db::list_performances(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_insert_and_read_back() {
    let (_dir, pool) = setup().await;

    let id = db::insert_performance(&pool, &input("A", "广东省", Some("2024-03-01")))
        .await
        .unwrap();

    let record = db::get_performance(&pool, id).await.unwrap().unwrap();
    assert_eq!(record.artist, "A");
    assert_eq!(record.kind, "concert");
    assert_eq!(record.venue.as_deref(), Some("Livehouse"));
    assert_eq!(record.city, None);
    assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(record.poster, None);
}

#[tokio::test]
async fn test_insert_rejects_missing_required_fields() {
    let (_dir, pool) = setup().await;

    let err = db::insert_performance(&pool, &input("", "广东省", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(db::list_performances(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_whitespace_only_required_field_is_rejected() {
    let (_dir, pool) = setup().await;

    let err = db::insert_performance(&pool, &input("A", "  \t", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    // The table constraint holds even when validation is bypassed
    let raw = sqlx::query("INSERT INTO performances (artist, type, province) VALUES (?, ?, ?)")
        .bind("   ")
        .bind("concert")
        .bind("广东省")
        .execute(&pool)
        .await;
    assert!(raw.is_err());
    assert!(db::list_performances(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (_dir, pool) = setup().await;

    let first = db::insert_performance(&pool, &input("A", "广东省", None)).await.unwrap();
    let second = db::insert_performance(&pool, &input("B", "北京市", None)).await.unwrap();

    let ids: Vec<i64> = db::list_performances(&pool)
        .await
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_filters_by_artist_and_province() {
    let (_dir, pool) = setup().await;

    db::insert_performance(&pool, &input("A", "广东省", Some("2024-01-01"))).await.unwrap();
    db::insert_performance(&pool, &input("A", "北京市", Some("2024-05-01"))).await.unwrap();
    db::insert_performance(&pool, &input("B", "广东省", None)).await.unwrap();

    let by_artist = db::performances_by_artist(&pool, "A").await.unwrap();
    let dates: Vec<_> = by_artist.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![NaiveDate::from_ymd_opt(2024, 5, 1), NaiveDate::from_ymd_opt(2024, 1, 1)]
    );

    // Exact stored value, no normalization at the store level
    assert_eq!(db::performances_by_province(&pool, "广东省").await.unwrap().len(), 2);
    assert!(db::performances_by_province(&pool, "广东").await.unwrap().is_empty());

    assert_eq!(db::list_artists(&pool).await.unwrap(), vec!["A", "B"]);
}

#[tokio::test]
async fn test_update_keeps_poster_unless_replaced() {
    let (_dir, pool) = setup().await;

    let mut original = input("A", "广东省", Some("2024-03-01"));
    original.poster = Some("/api/uploads/old.png".to_string());
    let id = db::insert_performance(&pool, &original).await.unwrap();

    let mut edited = input("A2", "湖南省", None);
    edited.venue = None;
    assert!(db::update_performance(&pool, id, &edited).await.unwrap());

    let record = db::get_performance(&pool, id).await.unwrap().unwrap();
    assert_eq!(record.artist, "A2");
    assert_eq!(record.province, "湖南省");
    assert_eq!(record.venue, None);
    assert_eq!(record.date, None);
    assert_eq!(record.poster.as_deref(), Some("/api/uploads/old.png"));

    edited.poster = Some("/api/uploads/new.png".to_string());
    assert!(db::update_performance(&pool, id, &edited).await.unwrap());
    let record = db::get_performance(&pool, id).await.unwrap().unwrap();
    assert_eq!(record.poster.as_deref(), Some("/api/uploads/new.png"));
}

#[tokio::test]
async fn test_update_and_delete_missing_id() {
    let (_dir, pool) = setup().await;

    assert!(!db::update_performance(&pool, 42, &input("A", "广东省", None)).await.unwrap());
    assert!(!db::delete_performance(&pool, 42).await.unwrap());
}

#[tokio::test]
async fn test_delete_is_permanent() {
    let (_dir, pool) = setup().await;

    let id = db::insert_performance(&pool, &input("A", "广东省", None)).await.unwrap();
    assert!(db::delete_performance(&pool, id).await.unwrap());
    assert!(db::get_performance(&pool, id).await.unwrap().is_none());
    assert!(!db::delete_performance(&pool, id).await.unwrap());
}

#[tokio::test]
async fn test_garbage_date_column_loads_as_undated() {
    let (_dir, pool) = setup().await;

    sqlx::query(
        "INSERT INTO performances (artist, type, province, date) VALUES ('A', 'concert', '广东省', 'someday')",
    )
    .execute(&pool)
    .await
    .unwrap();
    db::insert_performance(&pool, &input("B", "广东省", Some("2024-02-02"))).await.unwrap();

    let records = db::list_performances(&pool).await.unwrap();
    assert_eq!(records.len(), 2);

    let dashboard = Dashboard::compute(&records, 10, MonthLocale::Zh);
    assert_eq!(dashboard.record_count, 2);
    assert_eq!(dashboard.monthly.total, 1);
}

#[tokio::test]
async fn test_schema_description_and_ping() {
    let (_dir, pool) = setup().await;

    let columns = db::table_columns(&pool).await.unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "artist", "type", "province", "city", "venue", "notes", "date", "poster", "created_at"]
    );
    assert!(columns[0].primary_key);
    assert!(columns[1].not_null);
    assert!(!columns[4].not_null);
    assert_eq!(columns[9].default_value.as_deref(), Some("CURRENT_TIMESTAMP"));

    assert_eq!(db::ping(&pool).await.unwrap(), 1);
}
