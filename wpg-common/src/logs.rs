//! The post log and the analytics log

use crate::records::{AnalyticsRecord, MetricEntry, Platform, PostRecord};
use crate::store::{CsvLog, FileStore, LogRecord};
use crate::Result;
use chrono::NaiveDate;

impl LogRecord for PostRecord {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Title",
        "Sample Artist",
        "Sample Track",
        "Sample Year",
        "Tags",
        "YouTube URL",
        "SoundCloud URL",
    ];
}

impl LogRecord for AnalyticsRecord {
    const HEADERS: &'static [&'static str] = &[
        "Date",
        "Platform",
        "Track Title",
        "Reach",
        "Likes",
        "Saves",
        "Comments",
        "Clicks",
    ];
}

/// Generated posts, oldest first
pub type PostLog<S = FileStore> = CsvLog<PostRecord, S>;

/// Manually entered engagement snapshots, oldest first
pub type AnalyticsLog<S = FileStore> = CsvLog<AnalyticsRecord, S>;

/// Fan one submission out to a record per platform, sharing date and title.
///
/// Platforms appear in the order given; the caller appends them with
/// [`CsvLog::append_batch`] so the submission lands in one rewrite.
pub fn platform_batch(
    date: NaiveDate,
    track_title: Option<String>,
    entries: Vec<(Platform, MetricEntry)>,
) -> Vec<AnalyticsRecord> {
    let track_title = track_title.filter(|t| !t.trim().is_empty());
    entries
        .into_iter()
        .map(|(platform, metrics)| metrics.into_record(date, platform, track_title.clone()))
        .collect()
}

/// Append a per-platform submission atomically; returns the new row count
pub fn append_platform_batch<S: crate::store::RowStore>(
    log: &AnalyticsLog<S>,
    date: NaiveDate,
    track_title: Option<String>,
    entries: Vec<(Platform, MetricEntry)>,
) -> Result<usize> {
    log.append_batch(platform_batch(date, track_title, entries))
}
