//! Parsing of `--entry PLATFORM=reach,likes,saves,comments,clicks`

use anyhow::{bail, Result};
use wpg_common::records::{MetricEntry, Platform};

/// Parse one batch entry. Missing trailing metrics are blank; blanks are
/// kept as entered so the digest can skip them.
pub fn parse_entry(raw: &str) -> Result<(Platform, MetricEntry)> {
    let Some((platform, metrics)) = raw.split_once('=') else {
        bail!("entry '{}' must look like PLATFORM=reach,likes,saves,comments,clicks", raw);
    };
    let platform: Platform = platform.parse()?;

    let fields: Vec<&str> = metrics.split(',').map(str::trim).collect();
    if fields.len() > 5 {
        bail!("entry '{}' has {} metrics, expected at most 5", raw, fields.len());
    }
    let field = |i: usize| fields.get(i).copied().unwrap_or("").to_string();

    Ok((
        platform,
        MetricEntry {
            reach: field(0),
            likes: field(1),
            saves: field(2),
            comments: field(3),
            clicks: field(4),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_entry() {
        let (platform, m) = parse_entry("Instagram=1200,80,12,4,7").unwrap();
        assert_eq!(platform, Platform::Instagram);
        assert_eq!(m.reach, "1200");
        assert_eq!(m.clicks, "7");
    }

    #[test]
    fn test_short_entry_leaves_blanks() {
        let (platform, m) = parse_entry("youtube=900, 31").unwrap();
        assert_eq!(platform, Platform::YouTube);
        assert_eq!(m.likes, "31");
        assert_eq!(m.saves, "");
        assert_eq!(m.clicks, "");
    }

    #[test]
    fn test_rejects_missing_equals_and_unknown_platform() {
        assert!(parse_entry("Instagram 1200").is_err());
        assert!(parse_entry("Vine=10").is_err());
        assert!(parse_entry("Other=1,2,3,4,5,6").is_err());
    }
}
