//! Plain-text rendering of logs and tag sets

use std::path::PathBuf;

use anyhow::{Context, Result};
use wpg_common::records::{AnalyticsRecord, PostRecord};
use wpg_common::tags::TagCatalog;

pub fn print_catalog(catalog: &TagCatalog) {
    println!("Core (always included): {}", catalog.core().join(" "));
    println!(
        "Rotating (pick up to {}): {}",
        catalog.max_rotating(),
        catalog.rotating_options().join(" ")
    );
    println!("Trendy: {}", catalog.trendy_options().join(" "));
}

pub fn print_posts(rows: &[PostRecord]) {
    if rows.is_empty() {
        println!("No posts logged yet.");
        return;
    }
    for (i, r) in rows.iter().enumerate() {
        println!(
            "{:>4}  {}  {}  [{} - {} ({})]  {}",
            i, r.date, r.title, r.sample_artist, r.sample_title, r.sample_year, r.tags
        );
    }
}

pub fn print_analytics(rows: &[AnalyticsRecord]) {
    if rows.is_empty() {
        println!("No analytics logged yet.");
        return;
    }
    println!(
        "{:>4}  {:<10}  {:<10}  {:<20}  {:>8}  {:>6}  {:>6}  {:>8}  {:>6}",
        "#", "Date", "Platform", "Track", "Reach", "Likes", "Saves", "Comments", "Clicks"
    );
    for (i, r) in rows.iter().enumerate() {
        println!(
            "{:>4}  {:<10}  {:<10}  {:<20}  {:>8}  {:>6}  {:>6}  {:>8}  {:>6}",
            i,
            r.date.to_string(),
            r.platform.as_str(),
            r.track_title.as_deref().unwrap_or("-"),
            r.reach,
            r.likes,
            r.saves,
            r.comments,
            r.clicks
        );
    }
}

/// Write exported CSV to a file, or stdout when no file is given
pub fn export(csv: &str, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(&path, csv).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported to {}", path.display());
        }
        None => print!("{}", csv),
    }
    Ok(())
}
