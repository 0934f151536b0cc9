//! wpg - terminal front end for the Wantumeni post generator
//!
//! One subcommand per user action: generate captions, review or prune the
//! post and analytics logs, and print the weekly digest. Each invocation
//! runs to completion; the logs are plain files in the root folder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wpg_common::compose::{TrackDescriptor, TEMPLATES};
use wpg_common::config::{RootFolderResolver, TomlConfig};
use wpg_common::records::{MetricEntry, Platform};
use wpg_common::tags::{FormatMode, TagSelection};
use wpg_common::{time, Workspace};

mod entry;
mod output;

/// Command-line arguments for wpg
#[derive(Parser, Debug)]
#[command(name = "wpg")]
#[command(about = "Weekly post generator and engagement log")]
#[command(version)]
struct Args {
    /// Folder holding post_log.csv and analytics_log.csv
    #[arg(short, long, env = "WPG_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose captions for a track and record the post
    Generate(GenerateArgs),
    /// Show the configured tag sets
    Tags,
    /// Post log operations
    Posts {
        #[command(subcommand)]
        action: LogAction,
    },
    /// Analytics log operations
    Analytics {
        #[command(subcommand)]
        action: AnalyticsAction,
    },
    /// Weekly performance digest
    Digest {
        /// Any date inside the week to summarize (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    artist: String,
    #[arg(long, default_value = "")]
    sample: String,
    #[arg(long, default_value = "")]
    year: String,
    #[arg(long)]
    youtube: Option<String>,
    #[arg(long)]
    soundcloud: Option<String>,
    /// Rotating tag (repeatable)
    #[arg(long = "rotating")]
    rotating: Vec<String>,
    /// Trendy tag (repeatable)
    #[arg(long = "trendy")]
    trendy: Vec<String>,
    /// with-hash, without-hash or comma
    #[arg(long, default_value = "with-hash")]
    format: FormatMode,
    /// Print only; do not record in the post log
    #[arg(long)]
    no_save: bool,
}

#[derive(Subcommand, Debug)]
enum LogAction {
    /// Print every row with its index
    List,
    /// Delete the row at INDEX (0-based, as shown by list)
    Delete { index: usize },
    /// Write the log as CSV to stdout or a file
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum AnalyticsAction {
    /// Record metrics for one platform
    Add {
        #[arg(long)]
        platform: Platform,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        track: Option<String>,
        #[arg(long, default_value = "")]
        reach: String,
        #[arg(long, default_value = "")]
        likes: String,
        #[arg(long, default_value = "")]
        saves: String,
        #[arg(long, default_value = "")]
        comments: String,
        #[arg(long, default_value = "")]
        clicks: String,
    },
    /// Record several platforms in one submission
    Batch {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        track: Option<String>,
        /// PLATFORM=reach,likes,saves,comments,clicks (repeatable)
        #[arg(long = "entry", required = true)]
        entries: Vec<String>,
    },
    #[command(flatten)]
    Log(LogAction),
}

fn init_tracing(verbosity: u8, configured: &str) {
    let level = match verbosity {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    // Reported once tracing is installed
    let (config, config_error) = match TomlConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (TomlConfig::default(), Some(e)),
    };
    init_tracing(args.verbose, &config.logging.level);
    if let Some(e) = config_error {
        warn!("Ignoring config file, using defaults: {}", e);
    }

    let root_folder = RootFolderResolver::new(args.root_folder.clone(), &config).resolve();
    let workspace = Workspace::open(&root_folder, &config)
        .with_context(|| format!("Failed to open root folder {}", root_folder.display()))?;

    run(&workspace, args.command)
}

fn run(ws: &Workspace, command: Command) -> Result<()> {
    match command {
        Command::Generate(g) => generate(ws, g),
        Command::Tags => {
            output::print_catalog(ws.catalog());
            Ok(())
        }
        Command::Posts { action } => match action {
            LogAction::List => {
                output::print_posts(&ws.posts.list()?);
                Ok(())
            }
            LogAction::Delete { index } => {
                let removed = ws.posts.delete(index).context("Delete failed")?;
                println!("Deleted post {}: {} ({})", index, removed.title, removed.date);
                Ok(())
            }
            LogAction::Export { output: path } => output::export(&ws.posts.export()?, path),
        },
        Command::Analytics { action } => analytics(ws, action),
        Command::Digest { date } => {
            let digest = ws.digest(date.unwrap_or_else(time::today))?;
            print!("{}", digest);
            Ok(())
        }
    }
}

fn generate(ws: &Workspace, g: GenerateArgs) -> Result<()> {
    let track = TrackDescriptor {
        title: g.title,
        sample_artist: g.artist,
        sample_title: g.sample,
        sample_year: g.year,
        youtube_url: g.youtube,
        soundcloud_url: g.soundcloud,
    };
    let selection = TagSelection {
        rotating: g.rotating,
        trendy: g.trendy,
    };

    let composition = if g.no_save {
        ws.compose(&track, &selection, g.format)?
    } else {
        let composition = ws
            .generate(&track, &selection, g.format, time::today())
            .context("Failed to save post")?;
        info!("Recorded \"{}\" in the post log", track.title);
        composition
    };

    for template in TEMPLATES {
        if let Some(caption) = composition.captions.get(&template.name) {
            println!("=== {} ===", template.heading);
            println!("{}", caption);
        }
    }
    println!("=== All Tags (Copy/Paste) ===");
    println!("{}", composition.tag_line);
    Ok(())
}

fn analytics(ws: &Workspace, action: AnalyticsAction) -> Result<()> {
    match action {
        AnalyticsAction::Add {
            platform,
            date,
            track,
            reach,
            likes,
            saves,
            comments,
            clicks,
        } => {
            let metrics = MetricEntry {
                reach,
                likes,
                saves,
                comments,
                clicks,
            };
            let date = date.unwrap_or_else(time::today);
            let total = wpg_common::logs::append_platform_batch(
                &ws.analytics,
                date,
                track,
                vec![(platform, metrics)],
            )
            .context("Failed to save analytics")?;
            println!("Saved {} analytics for {} ({} rows)", platform, date, total);
            Ok(())
        }
        AnalyticsAction::Batch { date, track, entries } => {
            let parsed = entries
                .iter()
                .map(|e| entry::parse_entry(e))
                .collect::<Result<Vec<_>>>()?;
            let count = parsed.len();
            let date = date.unwrap_or_else(time::today);
            let total = wpg_common::logs::append_platform_batch(&ws.analytics, date, track, parsed)
                .context("Failed to save analytics batch; log unchanged")?;
            println!("Saved {} platform entries for {} ({} rows)", count, date, total);
            Ok(())
        }
        AnalyticsAction::Log(LogAction::List) => {
            output::print_analytics(&ws.analytics.list()?);
            Ok(())
        }
        AnalyticsAction::Log(LogAction::Delete { index }) => {
            let removed = ws.analytics.delete(index).context("Delete failed")?;
            println!("Deleted analytics row {}: {} on {}", index, removed.platform, removed.date);
            Ok(())
        }
        AnalyticsAction::Log(LogAction::Export { output: path }) => output::export(&ws.analytics.export()?, path),
    }
}
