//! Per-artist and per-province appearance rankings

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::db::PerformanceRecord;

/// Default number of entries kept by the rankings
pub const DEFAULT_TOP_N: usize = 10;

/// Administrative suffixes removed before grouping by province:
/// province, autonomous region, the Uyghur / Hui / Zhuang qualifiers and
/// special administrative region.
///
/// This is plain substring removal, so a token appearing inside a name is
/// stripped as well. "市" (municipality) is deliberately not in the set.
static PROVINCE_SUFFIXES: Lazy<Regex> = Lazy::new(|| {
    Regex::new("省|自治区|维吾尔|回族|壮族|特别行政区").expect("province suffix pattern is valid")
});

/// Appearance count for one artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistBucket {
    pub artist: String,
    pub count: usize,
}

/// Appearance count for one normalized province
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvinceBucket {
    pub province: String,
    pub count: usize,
}

/// Strip administrative suffix tokens from a province name
///
/// ```
/// use showlog_common::stats::normalize_province;
///
/// assert_eq!(normalize_province("广东省"), "广东");
/// assert_eq!(normalize_province("内蒙古自治区"), "内蒙古");
/// assert_eq!(normalize_province("北京市"), "北京市");
/// ```
pub fn normalize_province(province: &str) -> String {
    PROVINCE_SUFFIXES.replace_all(province, "").into_owned()
}

/// Count keys, keeping first-encountered order, then sort by count descending.
///
/// `sort_by` is stable, so equal counts stay in first-encountered order.
fn rank<'a>(keys: impl Iterator<Item = Cow<'a, str>>, top_n: usize) -> Vec<(String, usize)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for key in keys {
        match index.get(key.as_ref()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.to_string(), counts.len());
                counts.push((key.into_owned(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(top_n);
    counts
}

/// Rank artists by number of performances across the whole record set.
///
/// Artist names are compared exactly (case-sensitive, untrimmed). Ties keep
/// the order in which the artists first appear in `records`.
pub fn compute_artist_ranking(records: &[PerformanceRecord], top_n: usize) -> Vec<ArtistBucket> {
    rank(records.iter().map(|r| Cow::Borrowed(r.artist.as_str())), top_n)
        .into_iter()
        .map(|(artist, count)| ArtistBucket { artist, count })
        .collect()
}

/// Rank normalized provinces by number of performances.
///
/// Ties keep first-encountered order, as for artists.
pub fn compute_province_ranking(
    records: &[PerformanceRecord],
    top_n: usize,
) -> Vec<ProvinceBucket> {
    rank(
        records.iter().map(|r| Cow::Owned(normalize_province(&r.province))),
        top_n,
    )
    .into_iter()
    .map(|(province, count)| ProvinceBucket { province, count })
    .collect()
}
