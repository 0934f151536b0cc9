//! Configuration loading and root folder resolution
//!
//! Configuration is a single optional TOML file. Every key has a compiled
//! default, so a missing or broken file degrades to defaults with a warning
//! instead of stopping the tool.
//!
//! # Root folder priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `WPG_ROOT_FOLDER` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "WPG_ROOT_FOLDER";

/// File name of the post log inside the root folder
pub const POST_LOG_FILE: &str = "post_log.csv";

/// File name of the analytics log inside the root folder
pub const ANALYTICS_LOG_FILE: &str = "analytics_log.csv";

/// Complete TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding both logs
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub brand: BrandConfig,

    #[serde(default)]
    pub tags: TagConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fixed brand text and links interpolated into every caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    pub artist: String,
    pub label: String,
    pub linktree: String,
    pub instagram: String,
    pub soundcloud: String,
    pub tiktok: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            artist: "wantumeni".to_string(),
            label: "M.I.L.E. Music".to_string(),
            linktree: "https://linktr.ee/wantumeni".to_string(),
            instagram: "https://instagram.com/wantumeni.x".to_string(),
            soundcloud: "https://soundcloud.com/wantumeni".to_string(),
            tiktok: "https://tiktok.com/@wantumeni".to_string(),
        }
    }
}

/// Fixed hashtag sets offered to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Always included, identifies the channel
    pub core: Vec<String>,
    /// Offered for multi-select, capped at `max_rotating`
    pub rotating: Vec<String>,
    /// Offered for multi-select, uncapped
    pub trendy: Vec<String>,
    pub max_rotating: usize,
}

impl Default for TagConfig {
    fn default() -> Self {
        fn owned(tags: &[&str]) -> Vec<String> {
            tags.iter().map(|t| t.to_string()).collect()
        }

        Self {
            core: owned(&[
                "#boombap",
                "#hiphopinstrumental",
                "#beatmaker",
                "#akai",
                "#wantumeni",
            ]),
            rotating: owned(&[
                "#lofi",
                "#sampling",
                "#samples",
                "#beats",
                "#beattape",
                "#hiphop",
                "#hiphopbeats",
                "#instrumental",
                "#soul",
                "#soulful",
                "#oldschool",
                "#cratedigger",
                "#vinyl",
            ]),
            trendy: owned(&[
                "#typebeat",
                "#undergroundhiphop",
                "#instrumentals",
                "#musicproducer",
                "#drumbreaks",
                "#freestyletypebeat",
                "#jazzhop",
                "#90shiphop",
            ]),
            max_rotating: 10,
        }
    }
}

impl TomlConfig {
    /// Load the config file from its platform location.
    ///
    /// No file means compiled defaults; a file that fails to parse is an error.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => {
                let config = load_toml_config(&path)?;
                debug!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => {
                debug!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write a TOML config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Locate the config file for the platform, if one exists
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("wpg").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/wpg/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("wpg"))
        .unwrap_or_else(|| PathBuf::from("./wpg_data"))
}

/// Resolves the root folder following the documented priority order
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    config_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>, config: &TomlConfig) -> Self {
        Self {
            cli_arg,
            config_root: config.root_folder.clone(),
        }
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.config_root {
            return path.clone();
        }

        default_root_folder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tag_config_matches_channel() {
        let tags = TagConfig::default();
        assert_eq!(tags.core.len(), 5);
        assert_eq!(tags.core.last().map(String::as_str), Some("#wantumeni"));
        assert_eq!(tags.max_rotating, 10);
        assert!(tags.trendy.contains(&"#jazzhop".to_string()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [brand]
            artist = "someone"
            "#,
        )
        .unwrap();

        assert_eq!(config.brand.artist, "someone");
        assert_eq!(config.brand.label, "M.I.L.E. Music");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.tags, TagConfig::default());
        assert!(config.root_folder.is_none());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "root_folder = [").unwrap();

        let err = load_toml_config(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
