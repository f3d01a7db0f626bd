//! Month-bucketed performance counts

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::PerformanceRecord;

const ZH_MONTHS: [&str; 12] = [
    "一月", "二月", "三月", "四月", "五月", "六月",
    "七月", "八月", "九月", "十月", "十一月", "十二月",
];

const EN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Locale used for month bucket labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLocale {
    #[default]
    Zh,
    En,
}

impl MonthLocale {
    /// All twelve labels, January first
    pub fn labels(self) -> &'static [&'static str; 12] {
        match self {
            MonthLocale::Zh => &ZH_MONTHS,
            MonthLocale::En => &EN_MONTHS,
        }
    }

    /// Label for a date's calendar month
    pub fn label_for(self, date: NaiveDate) -> &'static str {
        self.labels()[date.month0() as usize]
    }

    /// Zero-based month index for a label, if it belongs to this locale
    pub fn index_of(self, label: &str) -> Option<usize> {
        self.labels().iter().position(|l| *l == label)
    }
}

impl std::str::FromStr for MonthLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" => Ok(MonthLocale::Zh),
            "en" | "en-us" => Ok(MonthLocale::En),
            other => Err(format!("unsupported month locale: {}", other)),
        }
    }
}

/// Count for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub month: String,
    pub count: usize,
}

/// Twelve month buckets plus their sum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyDistribution {
    pub buckets: Vec<MonthlyBucket>,
    /// Sum of bucket counts; records without a usable date are not included
    pub total: usize,
}

/// Bucket records by the calendar month of their performance date.
///
/// All twelve months are always present, in January..December order.
/// Records whose `date` is `None` are skipped.
///
/// # Examples
///
/// ```
/// use showlog_common::stats::{compute_monthly_distribution, MonthLocale};
///
/// let dist = compute_monthly_distribution(&[], MonthLocale::En);
/// assert_eq!(dist.buckets.len(), 12);
/// assert_eq!(dist.buckets[0].month, "January");
/// assert_eq!(dist.total, 0);
/// ```
pub fn compute_monthly_distribution(
    records: &[PerformanceRecord],
    locale: MonthLocale,
) -> MonthlyDistribution {
    let mut counts = [0usize; 12];
    for date in records.iter().filter_map(|r| r.date) {
        counts[date.month0() as usize] += 1;
    }

    let buckets = locale
        .labels()
        .iter()
        .zip(counts)
        .map(|(label, count)| MonthlyBucket {
            month: (*label).to_string(),
            count,
        })
        .collect();

    MonthlyDistribution {
        buckets,
        total: counts.iter().sum(),
    }
}
