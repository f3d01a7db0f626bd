//! Records behind a clicked chart bucket

use std::cmp::Reverse;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::month::MonthLocale;
use super::ranking::normalize_province;
use crate::db::PerformanceRecord;

/// Which aggregate a drill-down key refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillDownKind {
    Month,
    Artist,
    Province,
}

impl std::str::FromStr for DrillDownKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(DrillDownKind::Month),
            "artist" => Ok(DrillDownKind::Artist),
            "province" => Ok(DrillDownKind::Province),
            other => Err(format!("unknown drill-down kind: {}", other)),
        }
    }
}

/// Selected bucket and the records behind it
///
/// Owned by the caller; clearing the selection is simply dropping it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrillDownSelection {
    pub kind: DrillDownKind,
    pub key: String,
    pub records: Vec<PerformanceRecord>,
}

/// Select the records matching `key` for the given bucket kind.
///
/// - `Month`: `key` is a month label in `locale`; records without a date never match.
/// - `Artist`: exact artist name.
/// - `Province`: normalized province name (see [`normalize_province`]).
///
/// Matches are returned newest performance date first for every kind;
/// undated records go last and ties keep input order. No match yields an
/// empty selection.
pub fn select_drill_down(
    kind: DrillDownKind,
    key: &str,
    records: &[PerformanceRecord],
    locale: MonthLocale,
) -> DrillDownSelection {
    let month = match kind {
        DrillDownKind::Month => locale.index_of(key),
        _ => None,
    };

    let mut matching: Vec<PerformanceRecord> = records
        .iter()
        .filter(|r| match kind {
            DrillDownKind::Month => match (month, r.date) {
                (Some(m), Some(date)) => date.month0() as usize == m,
                _ => false,
            },
            DrillDownKind::Artist => r.artist == key,
            DrillDownKind::Province => normalize_province(&r.province) == key,
        })
        .cloned()
        .collect();

    // Option orders None before Some, so Reverse puts undated records last
    matching.sort_by_key(|r| Reverse(r.date));

    DrillDownSelection {
        kind,
        key: key.to_string(),
        records: matching,
    }
}
