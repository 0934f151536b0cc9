//! Caption templates and post composition
//!
//! Each template is data: a name, a heading, flavor tags appended for that
//! platform, and a skeleton with `{placeholder}` fields. Composition is pure
//! string interpolation; persisting the result is a separate step.

use crate::config::BrandConfig;
use crate::records::PostRecord;
use crate::tags::{FormatMode, TagSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rendered in place of a blank optional URL
pub const URL_PLACEHOLDER: &str = "[URL]";

/// Form fields describing one track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub title: String,
    #[serde(default)]
    pub sample_artist: String,
    #[serde(default)]
    pub sample_title: String,
    #[serde(default)]
    pub sample_year: String,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub soundcloud_url: Option<String>,
}

/// Weekly cadence templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateName {
    SundayMeta,
    SundayYoutube,
    WednesdayMeta,
    WednesdayYoutube,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::SundayMeta => "sunday_meta",
            TemplateName::SundayYoutube => "sunday_youtube",
            TemplateName::WednesdayMeta => "wednesday_meta",
            TemplateName::WednesdayYoutube => "wednesday_youtube",
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative caption template
#[derive(Debug)]
pub struct Template {
    pub name: TemplateName,
    pub heading: &'static str,
    /// Platform-flavor tags appended after the base set
    pub flavor: &'static [&'static str],
    pub skeleton: &'static str,
}

const META_FLAVOR: &[&str] = &["#viralbeat"];
const YOUTUBE_FLAVOR: &[&str] = &["#visuals"];

/// All templates, in display order
pub static TEMPLATES: &[Template] = &[
    Template {
        name: TemplateName::SundayMeta,
        heading: "Sunday - Meta / TikTok / Shorts",
        flavor: META_FLAVOR,
        skeleton: "\
🎧 Boom Bap Hip Hop Instrumental – “{title}” by {artist}
[unmastered demo]

Sample:
{sample_artist} – {sample_title} ({sample_year})

🔁 Weekly drops – Every Sunday
🎹 {tags}
📀 {label}

👉 Stream now via Linktree
🔗 {linktree}
",
    },
    Template {
        name: TemplateName::SundayYoutube,
        heading: "Sunday - YouTube",
        flavor: YOUTUBE_FLAVOR,
        skeleton: "\
🎧 {artist} – “{title}” | Boom Bap Hip Hop Instrumental
[unmastered demo]

Sample:
{sample_artist} – {sample_title} ({sample_year})

🔁 Weekly beat drops – Sundays
🎹 Raw boom bap / soulful samples / gritty drums
📀 {label}

🔊 Stream & download:
Linktree: {linktree}
Instagram: {instagram}
Soundcloud: {soundcloud}
TikTok: {tiktok}

{tags}
",
    },
    Template {
        name: TemplateName::WednesdayMeta,
        heading: "Wednesday - Meta / TikTok",
        flavor: META_FLAVOR,
        skeleton: "\
🎧 Missed it? “{title}” by {artist} just dropped
[unmastered demo] – Boom Bap Instrumental

Sampled from:
{sample_artist} – {sample_title} ({sample_year})

Now streaming on Soundcloud & YouTube
🔗 {linktree}

🔁 Weekly beat drops
🎹 {tags}
📀 {label}
",
    },
    Template {
        name: TemplateName::WednesdayYoutube,
        heading: "Wednesday - YouTube",
        flavor: YOUTUBE_FLAVOR,
        skeleton: "\
🎧 New drop: “{title}” by {artist} [unmastered demo]
Boom Bap Hip Hop Instrumental

Sampled from:
{sample_artist} – {sample_title} ({sample_year})

Now available:
🔗 YouTube: {youtube_url}
🔗 Soundcloud: {soundcloud_url}
🔗 All links: {linktree}

🔁 Weekly beat drops
🎹 Jazzy loops / gritty drums / classic vibe
📀 {label}

{tags}
",
    },
];

/// Output of one compose call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Composition {
    pub captions: BTreeMap<TemplateName, String>,
    /// Base tag set rendered without flavor tags, for copy/paste and the log
    pub tag_line: String,
    pub format: FormatMode,
}

impl Composition {
    /// The row that records this composition in the post log
    pub fn post_record(&self, track: &TrackDescriptor, date: NaiveDate) -> PostRecord {
        PostRecord {
            date,
            title: track.title.clone(),
            sample_artist: track.sample_artist.clone(),
            sample_title: track.sample_title.clone(),
            sample_year: track.sample_year.clone(),
            tags: self.tag_line.clone(),
            youtube_url: non_blank(&track.youtube_url).map(str::to_string),
            soundcloud_url: non_blank(&track.soundcloud_url).map(str::to_string),
        }
    }
}

/// Renders every template for a track
#[derive(Debug, Clone, Default)]
pub struct PostComposer {
    brand: BrandConfig,
}

impl PostComposer {
    pub fn new(brand: BrandConfig) -> Self {
        Self { brand }
    }

    pub fn brand(&self) -> &BrandConfig {
        &self.brand
    }

    pub fn compose(&self, track: &TrackDescriptor, tags: &TagSet, mode: FormatMode) -> Composition {
        let captions = TEMPLATES
            .iter()
            .map(|t| (t.name, self.render(t, track, tags, mode)))
            .collect();

        Composition {
            captions,
            tag_line: tags.render(mode),
            format: mode,
        }
    }

    /// Render a single template
    pub fn render(&self, template: &Template, track: &TrackDescriptor, tags: &TagSet, mode: FormatMode) -> String {
        let tag_line = tags.with_suffix(template.flavor).render(mode);
        interpolate(template.skeleton, |key| match key {
            "title" => Some(track.title.as_str()),
            "sample_artist" => Some(track.sample_artist.as_str()),
            "sample_title" => Some(track.sample_title.as_str()),
            "sample_year" => Some(track.sample_year.as_str()),
            "youtube_url" => Some(non_blank(&track.youtube_url).unwrap_or(URL_PLACEHOLDER)),
            "soundcloud_url" => Some(non_blank(&track.soundcloud_url).unwrap_or(URL_PLACEHOLDER)),
            "tags" => Some(tag_line.as_str()),
            "artist" => Some(self.brand.artist.as_str()),
            "label" => Some(self.brand.label.as_str()),
            "linktree" => Some(self.brand.linktree.as_str()),
            "instagram" => Some(self.brand.instagram.as_str()),
            "soundcloud" => Some(self.brand.soundcloud.as_str()),
            "tiktok" => Some(self.brand.tiktok.as_str()),
            _ => None,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Single-pass `{key}` substitution; unknown keys are left as written.
/// Substituted values are never rescanned.
fn interpolate<'a>(skeleton: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(skeleton.len() + 128);
    let mut rest = skeleton;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match lookup(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
