//! Row-store backends and the generic full-rewrite log
//!
//! A log is a header row plus data rows in comma-delimited UTF-8 text.
//! Every mutation loads all rows, changes them in memory and replaces the
//! whole content in one write. There is no locking: two processes writing
//! the same file can overwrite each other's changes (last writer wins).
//!
//! Rows are read one at a time. A row that does not deserialize is skipped
//! in listings with a warning but is written back unchanged on every
//! rewrite, so a single bad row never blocks the rest of the log.

use crate::{Error, Result};
use csv::ByteRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Byte-level persistence for one log
pub trait RowStore: Send + Sync {
    /// Full current content, `None` if the store has never been written
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the full content.
    ///
    /// On error the previous content must still be readable unchanged.
    fn replace(&self, content: &[u8]) -> Result<()>;

    /// Human-readable location for log messages
    fn describe(&self) -> String;
}

/// File-backed store; each write goes to a fresh temp file that is then
/// renamed over the log
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn persistence_error(&self, action: &str, e: impl std::fmt::Display) -> Error {
        Error::Persistence(format!("could not {} {}: {}", action, self.path.display(), e))
    }
}

impl RowStore for FileStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&self, content: &[u8]) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let prefix = format!(
            ".{}.",
            self.path.file_name().and_then(|n| n.to_str()).unwrap_or("log")
        );
        // Unique per writer; dropped (and removed) on any early return
        let mut tmp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| self.persistence_error("stage", e))?;

        tmp.write_all(content)
            .and_then(|_| tmp.flush())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.persistence_error("write", e))?;

        tmp.persist(&self.path)
            .map_err(|e| self.persistence_error("replace", e.error))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store for tests and dry runs.
///
/// Writes can be made to fail to exercise the all-or-nothing guarantee.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: Mutex<Option<Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing content, as if a file were already on disk
    pub fn with_content(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: Mutex::new(Some(content.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl RowStore for MemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.content.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn replace(&self, content: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Persistence("memory store is read-only".to_string()));
        }
        *self.content.lock().unwrap_or_else(|e| e.into_inner()) = Some(content.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// A row type that can live in a [`CsvLog`]
pub trait LogRecord: Serialize + DeserializeOwned {
    /// Column headers, in serialization order
    const HEADERS: &'static [&'static str];
}

/// One stored row: its fields aligned to `R::HEADERS`, and the typed row
/// when those fields deserialize
struct StoredRow<R> {
    fields: ByteRecord,
    row: Option<R>,
}

/// Ordered, append-and-delete log of `R` rows over a [`RowStore`].
///
/// Indices count readable rows only, in the order [`CsvLog::list`] returns
/// them.
pub struct CsvLog<R, S> {
    store: S,
    _rows: PhantomData<fn() -> R>,
}

impl<R: LogRecord, S: RowStore> CsvLog<R, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _rows: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All readable rows in insertion order; an absent store is an empty log
    pub fn list(&self) -> Result<Vec<R>> {
        Ok(self.load()?.into_iter().filter_map(|stored| stored.row).collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Append one row; returns the new row count
    pub fn append(&self, record: R) -> Result<usize> {
        self.append_batch(vec![record])
    }

    /// Append several rows in a single rewrite.
    ///
    /// Either every row is persisted or none is.
    pub fn append_batch(&self, records: Vec<R>) -> Result<usize> {
        let stored = self.load()?;
        let total = readable(&stored) + records.len();
        self.store.replace(&encode(&stored, &records)?)?;
        info!("Appended {} row(s) to {} ({} total)", records.len(), self.store.describe(), total);
        Ok(total)
    }

    /// Remove the readable row at `index`, compacting later rows down by one.
    ///
    /// An out-of-range index returns [`Error::IndexOutOfRange`] and leaves
    /// the store untouched.
    pub fn delete(&self, index: usize) -> Result<R> {
        let mut stored = self.load()?;
        let len = readable(&stored);
        let position = stored
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.row.as_ref().map(|_| i))
            .nth(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        let removed = stored.remove(position);
        self.store.replace(&encode::<R>(&stored, &[])?)?;
        info!("Deleted row {} from {} ({} left)", index, self.store.describe(), len - 1);
        removed
            .row
            .ok_or_else(|| Error::Internal(format!("row {} vanished during delete", index)))
    }

    /// Current content as comma-delimited text, header included even when
    /// empty; unreadable rows are exported as stored
    pub fn export(&self) -> Result<String> {
        let bytes = encode::<R>(&self.load()?, &[])?;
        Ok(String::from_utf8(bytes).unwrap_or_else(|e| {
            warn!("{} contains invalid UTF-8, replacing it in the export", self.store.describe());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }))
    }

    fn load(&self) -> Result<Vec<StoredRow<R>>> {
        let Some(bytes) = self.store.read()? else {
            debug!("{} does not exist yet, treating as empty", self.store.describe());
            return Ok(Vec::new());
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes.as_slice());

        // Map each known column to where the file keeps it; absent columns read as blank
        let file_headers = reader.byte_headers()?.clone();
        let columns: Vec<Option<usize>> = R::HEADERS
            .iter()
            .map(|wanted| {
                file_headers
                    .iter()
                    .position(|h| std::str::from_utf8(h).map(str::trim) == Ok(*wanted))
            })
            .collect();
        if !file_headers.is_empty() {
            for (header, column) in R::HEADERS.iter().zip(&columns) {
                if column.is_none() {
                    debug!("{} has no '{}' column, reading it as blank", self.store.describe(), header);
                }
            }
        }

        let headers = ByteRecord::from(R::HEADERS.to_vec());
        let mut stored = Vec::new();
        for result in reader.byte_records() {
            let record = result?;
            let fields: ByteRecord = columns
                .iter()
                .map(|c| c.and_then(|i| record.get(i)).unwrap_or_default())
                .collect();

            let row = match fields.deserialize::<R>(Some(&headers)) {
                Ok(row) => Some(row),
                Err(e) => {
                    let line = record.position().map_or(0, |p| p.line());
                    warn!("Skipping unreadable row at line {} of {}: {}", line, self.store.describe(), e);
                    None
                }
            };
            stored.push(StoredRow { fields, row });
        }
        debug!("Read {} rows from {}", stored.len(), self.store.describe());
        Ok(stored)
    }
}

fn readable<R>(stored: &[StoredRow<R>]) -> usize {
    stored.iter().filter(|s| s.row.is_some()).count()
}

fn encode<R: LogRecord>(stored: &[StoredRow<R>], appended: &[R]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(R::HEADERS)?;
    for row in stored {
        writer.write_byte_record(&row.fields)?;
    }
    for row in appended {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("failed to flush CSV buffer: {}", e)))
}
