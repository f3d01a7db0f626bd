//! Aggregation engine for the statistics dashboard
//!
//! Pure functions over a snapshot of performance records. Nothing here
//! touches the database or keeps state between calls; callers re-run the
//! functions whenever their record set changes.

mod drill_down;
mod month;
mod ranking;

use serde::Serialize;

pub use drill_down::{select_drill_down, DrillDownKind, DrillDownSelection};
pub use month::{compute_monthly_distribution, MonthLocale, MonthlyBucket, MonthlyDistribution};
pub use ranking::{
    compute_artist_ranking, compute_province_ranking, normalize_province, ArtistBucket,
    ProvinceBucket, DEFAULT_TOP_N,
};

use crate::db::PerformanceRecord;

/// All derived views shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// Number of records in the snapshot, dated or not
    pub record_count: usize,
    pub monthly: MonthlyDistribution,
    /// All-time ranking (no date window)
    pub artists: Vec<ArtistBucket>,
    pub provinces: Vec<ProvinceBucket>,
}

impl Dashboard {
    pub fn compute(records: &[PerformanceRecord], top_n: usize, locale: MonthLocale) -> Self {
        Self {
            record_count: records.len(),
            monthly: compute_monthly_distribution(records, locale),
            artists: compute_artist_ranking(records, top_n),
            provinces: compute_province_ranking(records, top_n),
        }
    }
}
