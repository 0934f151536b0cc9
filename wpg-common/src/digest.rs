//! Weekly performance digest over the analytics log
//!
//! Metrics are coerced at aggregation time. Values that fail coercion are
//! left out of sums and averages instead of counting as zero, and a figure
//! with nothing to aggregate is reported as `None` without affecting the
//! rest of the digest.

use crate::records::{AnalyticsRecord, Platform};
use crate::time::{start_of_week, WeekWindow};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Length of the trailing trend window, reference date included
pub const TREND_DAYS: i64 = 28;

/// Result of [`summarize`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Digest {
    /// Nothing was logged in the current week
    NoData { week: WeekWindow },
    Summary(WeeklySummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week: WeekWindow,
    pub previous_week: WeekWindow,
    pub record_count: usize,
    /// `None` when no record this week has a numeric reach
    pub top_performer: Option<TopPerformer>,
    pub platform_totals: Vec<PlatformTotals>,
    /// `None` when no record this week has a numeric reach
    pub growth: Option<Growth>,
    pub engagement: Vec<EngagementRate>,
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    pub record: AnalyticsRecord,
    pub reach: f64,
}

/// Sums for one platform; `None` means no numeric value was logged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformTotals {
    pub platform: Platform,
    pub records: usize,
    pub reach: Option<f64>,
    pub likes: Option<f64>,
    pub saves: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Growth {
    pub this_week_reach: f64,
    pub last_week_reach: f64,
    pub delta: f64,
    /// 0 when last week's reach was 0
    pub percent: f64,
}

/// Mean of per-row `likes / reach * 100`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementRate {
    pub platform: Platform,
    pub rate: Option<f64>,
    pub rows_used: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Monday starting the ISO week
    pub week_start: NaiveDate,
    pub records: usize,
    /// `None` when no record that week has a numeric reach
    pub reach: Option<f64>,
}

/// Summarize the week containing `reference_date`
pub fn summarize(records: &[AnalyticsRecord], reference_date: NaiveDate) -> Digest {
    let week = WeekWindow::containing(reference_date);
    let previous_week = week.previous();

    let this_week: Vec<&AnalyticsRecord> = records.iter().filter(|r| week.contains(r.date)).collect();
    if this_week.is_empty() {
        return Digest::NoData { week };
    }
    let last_week: Vec<&AnalyticsRecord> = records.iter().filter(|r| previous_week.contains(r.date)).collect();

    Digest::Summary(WeeklySummary {
        week,
        previous_week,
        record_count: this_week.len(),
        top_performer: top_performer(&this_week),
        platform_totals: platform_totals(&this_week),
        growth: growth(&this_week, &last_week),
        engagement: engagement_rates(&this_week),
        trend: trend(records, reference_date),
    })
}

/// Highest numeric reach; the first record wins ties
fn top_performer(records: &[&AnalyticsRecord]) -> Option<TopPerformer> {
    let mut best: Option<(&AnalyticsRecord, f64)> = None;
    for &record in records {
        if let Some(reach) = record.reach_value() {
            if best.map_or(true, |(_, top)| reach > top) {
                best = Some((record, reach));
            }
        }
    }
    best.map(|(record, reach)| TopPerformer {
        record: record.clone(),
        reach,
    })
}

fn sum_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.flatten().fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

fn platform_totals(records: &[&AnalyticsRecord]) -> Vec<PlatformTotals> {
    let mut by_platform: BTreeMap<Platform, Vec<&AnalyticsRecord>> = BTreeMap::new();
    for &record in records {
        by_platform.entry(record.platform).or_default().push(record);
    }

    by_platform
        .into_iter()
        .map(|(platform, rows)| PlatformTotals {
            platform,
            records: rows.len(),
            reach: sum_present(rows.iter().map(|r| r.reach_value())),
            likes: sum_present(rows.iter().map(|r| r.likes_value())),
            saves: sum_present(rows.iter().map(|r| r.saves_value())),
        })
        .collect()
}

fn growth(this_week: &[&AnalyticsRecord], last_week: &[&AnalyticsRecord]) -> Option<Growth> {
    let this_week_reach = sum_present(this_week.iter().map(|r| r.reach_value()))?;
    let last_week_reach = sum_present(last_week.iter().map(|r| r.reach_value())).unwrap_or(0.0);
    let delta = this_week_reach - last_week_reach;
    let percent = if last_week_reach != 0.0 {
        delta / last_week_reach * 100.0
    } else {
        0.0
    };

    Some(Growth {
        this_week_reach,
        last_week_reach,
        delta,
        percent,
    })
}

fn engagement_rates(records: &[&AnalyticsRecord]) -> Vec<EngagementRate> {
    let mut by_platform: BTreeMap<Platform, Vec<f64>> = BTreeMap::new();
    for record in records {
        let rates = by_platform.entry(record.platform).or_default();
        if let (Some(likes), Some(reach)) = (record.likes_value(), record.reach_value()) {
            if reach != 0.0 {
                rates.push(likes / reach * 100.0);
            }
        }
    }

    by_platform
        .into_iter()
        .map(|(platform, rates)| EngagementRate {
            platform,
            rate: if rates.is_empty() {
                None
            } else {
                Some(rates.iter().sum::<f64>() / rates.len() as f64)
            },
            rows_used: rates.len(),
        })
        .collect()
}

/// Reach per ISO week over the trailing window, oldest first
fn trend(records: &[AnalyticsRecord], reference_date: NaiveDate) -> Vec<TrendPoint> {
    let from = reference_date - Duration::days(TREND_DAYS - 1);
    let mut weeks: BTreeMap<NaiveDate, Vec<&AnalyticsRecord>> = BTreeMap::new();

    for record in records.iter().filter(|r| from <= r.date && r.date <= reference_date) {
        weeks.entry(start_of_week(record.date)).or_default().push(record);
    }

    weeks
        .into_iter()
        .map(|(week_start, rows)| TrendPoint {
            week_start,
            records: rows.len(),
            reach: sum_present(rows.iter().map(|r| r.reach_value())),
        })
        .collect()
}

fn figure(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}", v),
        None => "could not compute".to_string(),
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Digest::NoData { week } => {
                return writeln!(f, "No data for this week ({} to {})", week.start, week.end);
            }
            Digest::Summary(s) => s,
        };

        writeln!(f, "Week {} to {} ({} records)", s.week.start, s.week.end, s.record_count)?;

        match &s.top_performer {
            Some(top) => writeln!(
                f,
                "Top performer: {} on {} ({} reach)",
                top.record.track_title.as_deref().unwrap_or("untitled"),
                top.record.platform,
                figure(Some(top.reach))
            )?,
            None => writeln!(f, "Top performer: could not compute")?,
        }

        writeln!(f, "Totals by platform:")?;
        for t in &s.platform_totals {
            writeln!(
                f,
                "  {:<11} reach {}  likes {}  saves {}",
                t.platform.as_str(),
                figure(t.reach),
                figure(t.likes),
                figure(t.saves)
            )?;
        }

        match &s.growth {
            Some(g) => writeln!(
                f,
                "Growth: {:+.0} reach vs last week ({:+.1}%)",
                g.delta, g.percent
            )?,
            None => writeln!(f, "Growth: could not compute")?,
        }

        writeln!(f, "Engagement rate:")?;
        for e in &s.engagement {
            match e.rate {
                Some(rate) => writeln!(f, "  {:<11} {:.2}%", e.platform.as_str(), rate)?,
                None => writeln!(f, "  {:<11} could not compute", e.platform.as_str())?,
            }
        }

        writeln!(f, "Trend (last {} days):", TREND_DAYS)?;
        for p in &s.trend {
            writeln!(f, "  week of {}  {}", p.week_start, figure(p.reach))?;
        }
        Ok(())
    }
}
