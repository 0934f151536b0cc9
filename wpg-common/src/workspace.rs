//! Binds the two logs, the tag catalog and the composer to one root folder

use crate::compose::{Composition, PostComposer, TrackDescriptor};
use crate::config::{TomlConfig, ANALYTICS_LOG_FILE, POST_LOG_FILE};
use crate::digest::{summarize, Digest};
use crate::logs::{AnalyticsLog, PostLog};
use crate::store::{CsvLog, FileStore, RowStore};
use crate::tags::{FormatMode, TagCatalog, TagSelection};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

pub struct Workspace<P = FileStore, A = FileStore> {
    pub posts: PostLog<P>,
    pub analytics: AnalyticsLog<A>,
    catalog: TagCatalog,
    composer: PostComposer,
}

impl Workspace {
    /// Open (creating if needed) the root folder holding both logs
    pub fn open(root_folder: &Path, config: &TomlConfig) -> Result<Self> {
        std::fs::create_dir_all(root_folder)?;
        info!("Using root folder {}", root_folder.display());
        Ok(Self::with_stores(
            FileStore::new(root_folder.join(POST_LOG_FILE)),
            FileStore::new(root_folder.join(ANALYTICS_LOG_FILE)),
            config,
        ))
    }
}

impl<P: RowStore, A: RowStore> Workspace<P, A> {
    pub fn with_stores(posts: P, analytics: A, config: &TomlConfig) -> Self {
        Self {
            posts: CsvLog::new(posts),
            analytics: CsvLog::new(analytics),
            catalog: TagCatalog::new(&config.tags),
            composer: PostComposer::new(config.brand.clone()),
        }
    }

    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    pub fn composer(&self) -> &PostComposer {
        &self.composer
    }

    /// Compose every caption for a track without touching either log
    pub fn compose(&self, track: &TrackDescriptor, selection: &TagSelection, mode: FormatMode) -> Result<Composition> {
        if track.title.trim().is_empty() {
            return Err(Error::InvalidInput("track title is required".to_string()));
        }
        let tags = self
            .catalog
            .tag_set(selection, &track.sample_artist, &track.sample_title);
        Ok(self.composer.compose(track, &tags, mode))
    }

    /// Compose, then record the post in the post log
    pub fn generate(
        &self,
        track: &TrackDescriptor,
        selection: &TagSelection,
        mode: FormatMode,
        date: NaiveDate,
    ) -> Result<Composition> {
        let composition = self.compose(track, selection, mode)?;
        self.posts.append(composition.post_record(track, date))?;
        Ok(composition)
    }

    pub fn digest(&self, reference_date: NaiveDate) -> Result<Digest> {
        Ok(summarize(&self.analytics.list()?, reference_date))
    }
}
