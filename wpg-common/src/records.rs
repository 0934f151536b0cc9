//! Row types for the post and analytics logs
//!
//! Field renames match the comma-delimited column headers exactly, so the
//! structs are the schema.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// One generated post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Sample Artist")]
    pub sample_artist: String,
    #[serde(rename = "Sample Track")]
    pub sample_title: String,
    #[serde(rename = "Sample Year")]
    pub sample_year: String,
    /// Tag line, already rendered in the format mode chosen at generation
    #[serde(rename = "Tags")]
    pub tags: String,
    #[serde(rename = "YouTube URL")]
    pub youtube_url: Option<String>,
    #[serde(rename = "SoundCloud URL")]
    pub soundcloud_url: Option<String>,
}

/// Platforms engagement can be recorded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
    Facebook,
    SoundCloud,
    Shorts,
    Other,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Instagram,
        Platform::TikTok,
        Platform::YouTube,
        Platform::Facebook,
        Platform::SoundCloud,
        Platform::Shorts,
        Platform::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
            Platform::SoundCloud => "SoundCloud",
            Platform::Shorts => "Shorts",
            Platform::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidInput(format!("unknown platform '{}'", wanted)))
    }
}

// Same leniency as `FromStr`: hand-edited logs and JSON clients write "tiktok"
impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One manually entered engagement snapshot.
///
/// Metrics stay as entered so blanks and typos survive listing and export;
/// they are coerced only when aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Platform")]
    pub platform: Platform,
    #[serde(rename = "Track Title", default)]
    pub track_title: Option<String>,
    #[serde(rename = "Reach", default)]
    pub reach: String,
    #[serde(rename = "Likes", default)]
    pub likes: String,
    #[serde(rename = "Saves", default)]
    pub saves: String,
    #[serde(rename = "Comments", default)]
    pub comments: String,
    #[serde(rename = "Clicks", default)]
    pub clicks: String,
}

impl AnalyticsRecord {
    pub fn reach_value(&self) -> Option<f64> {
        parse_metric(&self.reach)
    }

    pub fn likes_value(&self) -> Option<f64> {
        parse_metric(&self.likes)
    }

    pub fn saves_value(&self) -> Option<f64> {
        parse_metric(&self.saves)
    }

    pub fn comments_value(&self) -> Option<f64> {
        parse_metric(&self.comments)
    }

    pub fn clicks_value(&self) -> Option<f64> {
        parse_metric(&self.clicks)
    }
}

/// Raw metric fields for one platform entry.
///
/// Each field accepts text or a number; numbers are kept as their text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricEntry {
    #[serde(default, deserialize_with = "metric_text")]
    pub reach: String,
    #[serde(default, deserialize_with = "metric_text")]
    pub likes: String,
    #[serde(default, deserialize_with = "metric_text")]
    pub saves: String,
    #[serde(default, deserialize_with = "metric_text")]
    pub comments: String,
    #[serde(default, deserialize_with = "metric_text")]
    pub clicks: String,
}

fn metric_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Metric {
        Text(String),
        Integer(i64),
        Number(f64),
    }

    Ok(match Option::<Metric>::deserialize(deserializer)? {
        Some(Metric::Text(text)) => text,
        Some(Metric::Integer(n)) => n.to_string(),
        Some(Metric::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

impl MetricEntry {
    pub fn into_record(self, date: NaiveDate, platform: Platform, track_title: Option<String>) -> AnalyticsRecord {
        AnalyticsRecord {
            date,
            platform,
            track_title,
            reach: self.reach,
            likes: self.likes,
            saves: self.saves,
            comments: self.comments,
            clicks: self.clicks,
        }
    }
}

/// Coerce a free-text metric to a number.
///
/// Blank, non-numeric and non-finite values are absent rather than zero.
/// Thousands separators are accepted.
///
/// ```
/// use wpg_common::records::parse_metric;
///
/// assert_eq!(parse_metric("1,200"), Some(1200.0));
/// assert_eq!(parse_metric(" 42 "), Some(42.0));
/// assert_eq!(parse_metric(""), None);
/// assert_eq!(parse_metric("n/a"), None);
/// ```
pub fn parse_metric(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trips_through_display() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_platform_parse_is_case_insensitive() {
        assert_eq!("tiktok".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!(" youtube ".parse::<Platform>().unwrap(), Platform::YouTube);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn test_parse_metric_rejects_garbage() {
        assert_eq!(parse_metric("abc"), None);
        assert_eq!(parse_metric("NaN"), None);
        assert_eq!(parse_metric("inf"), None);
        assert_eq!(parse_metric("   "), None);
    }

    #[test]
    fn test_parse_metric_accepts_decimals() {
        assert_eq!(parse_metric("12.5"), Some(12.5));
        assert_eq!(parse_metric("0"), Some(0.0));
    }

    #[test]
    fn test_platform_deserializes_case_insensitively() {
        let platform: Platform = serde_json::from_str("\"tiktok\"").unwrap();
        assert_eq!(platform, Platform::TikTok);
        assert!(serde_json::from_str::<Platform>("\"myspace\"").is_err());
    }

    #[test]
    fn test_metric_entry_accepts_numbers_and_text() {
        let entry: MetricEntry =
            serde_json::from_str(r#"{"reach": 1200, "likes": "80", "saves": 2.5, "comments": null}"#).unwrap();
        assert_eq!(entry.reach, "1200");
        assert_eq!(entry.likes, "80");
        assert_eq!(entry.saves, "2.5");
        assert_eq!(entry.comments, "");
        assert_eq!(entry.clicks, "");
    }

    #[test]
    fn test_metric_entry_into_record() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let record = MetricEntry {
            reach: "100".into(),
            likes: "10".into(),
            ..Default::default()
        }
        .into_record(date, Platform::Shorts, Some("Flip1".into()));

        assert_eq!(record.platform, Platform::Shorts);
        assert_eq!(record.reach_value(), Some(100.0));
        assert_eq!(record.saves_value(), None);
        assert_eq!(record.track_title.as_deref(), Some("Flip1"));
    }
}
