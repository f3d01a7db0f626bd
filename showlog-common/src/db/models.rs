//! Database models

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use crate::{Error, Result};

/// One logged live performance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub id: i64,
    pub artist: String,
    /// Performance kind (concert, festival, ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub province: String,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub notes: Option<String>,
    /// Performance date; `None` when absent or unparseable
    pub date: Option<NaiveDate>,
    /// URL path of the uploaded poster image
    pub poster: Option<String>,
    pub created_at: NaiveDateTime,
}

impl PerformanceRecord {
    /// Decode a `performances` row.
    ///
    /// The `date` column is free text in SQLite, so it goes through
    /// [`parse_performance_date`] instead of a typed decode.
    pub fn from_row(row: &SqliteRow) -> std::result::Result<Self, sqlx::Error> {
        let raw_date: Option<String> = row.try_get("date")?;
        let date = raw_date.as_deref().and_then(|raw| {
            let parsed = parse_performance_date(raw);
            if parsed.is_none() {
                debug!("Unparseable performance date {:?}, excluded from month buckets", raw);
            }
            parsed
        });

        Ok(Self {
            id: row.try_get("id")?,
            artist: row.try_get("artist")?,
            kind: row.try_get("type")?,
            province: row.try_get("province")?,
            city: row.try_get("city")?,
            venue: row.try_get("venue")?,
            notes: row.try_get("notes")?,
            date,
            poster: row.try_get("poster")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Fields accepted from the record-entry form
///
/// Also used for updates: a resubmitted form replaces every text field,
/// while `poster` is only replaced when a new upload is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceInput {
    pub artist: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub province: String,
    pub city: Option<String>,
    pub venue: Option<String>,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
    pub poster: Option<String>,
}

impl PerformanceInput {
    /// Reject writes with an empty artist, type or province
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("artist", &self.artist),
            ("type", &self.kind),
            ("province", &self.province),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "artist, type and province are required (missing: {})",
                missing.join(", ")
            )))
        }
    }
}

/// One column of the `performances` table as reported by `PRAGMA table_info`
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

/// Parse a stored performance date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and `YYYY-MM-DD HH:MM:SS`.
/// Returns `None` for anything else.
pub fn parse_performance_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_performance_date("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_parse_rfc3339_and_sql_timestamp() {
        assert_eq!(
            parse_performance_date("2024-03-15T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(
            parse_performance_date("2024-12-31 20:30:00"),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_performance_date(""), None);
        assert_eq!(parse_performance_date("   "), None);
        assert_eq!(parse_performance_date("next friday"), None);
        assert_eq!(parse_performance_date("2024-13-01"), None);
    }

    #[test]
    fn test_validate_requires_core_fields() {
        let input = PerformanceInput {
            artist: "A".to_string(),
            kind: "concert".to_string(),
            province: "广东省".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        let missing = PerformanceInput {
            artist: " ".to_string(),
            kind: "concert".to_string(),
            ..Default::default()
        };
        let err = missing.validate().unwrap_err().to_string();
        assert!(err.ends_with("(missing: artist, province)"), "{}", err);
    }
}
