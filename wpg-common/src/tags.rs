//! Hashtag normalization, tag-set assembly and rendering
//!
//! Tag order within a [`TagSet`] is fixed: core tags, rotating selections,
//! trendy selections, the sample-artist tag, then the sample-title tag.
//! Duplicates are kept; blank tags are kept in the set and dropped when the
//! set is rendered.

use crate::config::TagConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Turn free text into a slug hashtag.
///
/// Lowercases, keeps only `[a-z0-9]` and prefixes `#`. Text with nothing
/// left after stripping yields an empty string, never a bare `#`.
///
/// # Examples
///
/// ```
/// use wpg_common::tags::normalize;
///
/// assert_eq!(normalize("Lo-Fi Jazz!"), "#lofijazz");
/// assert_eq!(normalize("  Multi   Word  "), "#multiword");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let slug: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();

    if slug.is_empty() {
        String::new()
    } else {
        format!("#{}", slug)
    }
}

/// How a tag set is rendered into a single line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatMode {
    /// `#a #b`
    #[default]
    WithHash,
    /// `a b`
    WithoutHash,
    /// `a, b`
    CommaSeparated,
}

impl FormatMode {
    pub const ALL: [FormatMode; 3] = [
        FormatMode::WithHash,
        FormatMode::WithoutHash,
        FormatMode::CommaSeparated,
    ];

    /// Render tags in this mode, dropping blank entries first
    pub fn render<S: AsRef<str>>(&self, tags: &[S]) -> String {
        let bare = tags
            .iter()
            .map(|t| t.as_ref().trim().trim_start_matches('#'))
            .filter(|t| !t.is_empty());

        match self {
            FormatMode::WithHash => bare.map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "),
            FormatMode::WithoutHash => bare.collect::<Vec<_>>().join(" "),
            FormatMode::CommaSeparated => bare.collect::<Vec<_>>().join(", "),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatMode::WithHash => "with_hash",
            FormatMode::WithoutHash => "without_hash",
            FormatMode::CommaSeparated => "comma_separated",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "with_hash" | "hash" => Ok(FormatMode::WithHash),
            "without_hash" | "plain" => Ok(FormatMode::WithoutHash),
            "comma_separated" | "comma" => Ok(FormatMode::CommaSeparated),
            other => Err(Error::InvalidInput(format!("unknown format mode '{}'", other))),
        }
    }
}

/// Ordered hashtags for one post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new(tags: Vec<String>) -> Self {
        Self(tags)
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    /// Copy of this set with fixed flavor tags appended
    pub fn with_suffix(&self, suffix: &[&str]) -> Self {
        let mut tags = self.0.clone();
        tags.extend(suffix.iter().map(|t| t.to_string()));
        Self(tags)
    }

    pub fn render(&self, mode: FormatMode) -> String {
        mode.render(&self.0)
    }
}

/// User multi-select choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSelection {
    #[serde(default)]
    pub rotating: Vec<String>,
    #[serde(default)]
    pub trendy: Vec<String>,
}

/// Fixed tag sets plus the rotating cap
#[derive(Debug, Clone)]
pub struct TagCatalog {
    core: Vec<String>,
    rotating: Vec<String>,
    trendy: Vec<String>,
    max_rotating: usize,
}

impl TagCatalog {
    pub fn new(config: &TagConfig) -> Self {
        Self {
            core: normalize_all(&config.core),
            rotating: normalize_all(&config.rotating),
            trendy: normalize_all(&config.trendy),
            max_rotating: config.max_rotating,
        }
    }

    pub fn core(&self) -> &[String] {
        &self.core
    }

    pub fn rotating_options(&self) -> &[String] {
        &self.rotating
    }

    pub fn trendy_options(&self) -> &[String] {
        &self.trendy
    }

    pub fn max_rotating(&self) -> usize {
        self.max_rotating
    }

    /// Assemble the tag set for a track.
    ///
    /// Rotating selections past the cap are dropped, keeping the first ones.
    pub fn tag_set(&self, selection: &TagSelection, sample_artist: &str, sample_title: &str) -> TagSet {
        let mut rotating = normalize_all(&selection.rotating);
        if rotating.len() > self.max_rotating {
            warn!(
                "{} rotating tags selected, keeping the first {}",
                rotating.len(),
                self.max_rotating
            );
            rotating.truncate(self.max_rotating);
        }

        let mut tags = self.core.clone();
        tags.extend(rotating);
        tags.extend(normalize_all(&selection.trendy));
        tags.push(normalize(sample_artist));
        tags.push(normalize(sample_title));
        TagSet::new(tags)
    }
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self::new(&TagConfig::default())
    }
}

fn normalize_all(tags: &[String]) -> Vec<String> {
    tags.iter().map(|t| normalize(t)).collect()
}
