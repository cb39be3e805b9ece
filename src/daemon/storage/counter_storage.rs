use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, warn};

use crate::fs::operations::{replace_file, sibling_path, FileLock};

use super::entities::DayCounts;

/// Interface for abstracting persistence of [DayCounts].
pub trait CounterStorage {
    /// Loads every stored day. Missing or unreadable data results in an empty store, other I/O
    /// failures are returned.
    fn load(&self) -> impl Future<Output = Result<DayCounts>>;

    /// Overwrites persisted data with `counts`.
    fn flush(&self, counts: &DayCounts) -> impl Future<Output = Result<()>>;
}

/// Result of parsing data file content.
#[derive(Debug)]
enum ParsedCounts {
    Empty,
    Valid(DayCounts),
    Corrupt(serde_json::Error),
}

fn parse_counts(content: &str) -> ParsedCounts {
    if content.trim().is_empty() {
        return ParsedCounts::Empty;
    }
    match serde_json::from_str::<DayCounts>(content) {
        Ok(counts) => ParsedCounts::Valid(counts),
        Err(e) => ParsedCounts::Corrupt(e),
    }
}

/// The main realization of [CounterStorage]. Keeps all days in a single pretty printed JSON file
/// which is rewritten as a whole on every flush.
pub struct JsonCounterStorage {
    path: PathBuf,
}

impl JsonCounterStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads stored days. Unlike [CounterStorage::load] this neither creates the data file nor
    /// moves corrupt data away, so it's safe to use while a daemon owns the file. The only thing
    /// it may create is the `.lock` sidecar next to an existing data file.
    pub async fn read(&self) -> Result<DayCounts> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(DayCounts::new());
        }

        let lock = FileLock::shared(&self.path).await?;
        let result = tokio::fs::read_to_string(&self.path).await;
        lock.release().await?;

        match result {
            Ok(content) => match parse_counts(&content) {
                ParsedCounts::Empty => Ok(DayCounts::new()),
                ParsedCounts::Valid(counts) => Ok(counts),
                ParsedCounts::Corrupt(e) => {
                    warn!("Data file {:?} is corrupted, ignoring it: {e}", self.path);
                    Ok(DayCounts::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DayCounts::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Data file {:?} is not valid UTF-8, ignoring it", self.path);
                Ok(DayCounts::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_parent(&self) -> Result<(), std::io::Error> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                tokio::fs::create_dir_all(parent).await
            }
            _ => Ok(()),
        }
    }

    async fn load_inner(&self) -> Result<DayCounts> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => match parse_counts(&content) {
                ParsedCounts::Empty => {
                    debug!("Data file {:?} is empty", self.path);
                    Ok(DayCounts::new())
                }
                ParsedCounts::Valid(counts) => Ok(counts),
                ParsedCounts::Corrupt(e) => {
                    warn!("Data file {:?} is corrupted: {e}", self.path);
                    self.move_corrupt_aside().await?;
                    Ok(DayCounts::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Data file {:?} doesn't exist, creating it", self.path);
                self.write(&DayCounts::new()).await?;
                Ok(DayCounts::new())
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Data file {:?} is not valid UTF-8", self.path);
                self.move_corrupt_aside().await?;
                Ok(DayCounts::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The next flush would overwrite unreadable data, so it's kept next to the data file for
    /// manual recovery.
    async fn move_corrupt_aside(&self) -> Result<PathBuf, std::io::Error> {
        let suffix = format!(".corrupt-{}", Local::now().format("%Y%m%d%H%M%S"));
        let mut backup = sibling_path(&self.path, &suffix);
        let mut attempt = 1;
        // Timestamps have second resolution, never rename over an earlier backup.
        while tokio::fs::try_exists(&backup).await? {
            backup = sibling_path(&self.path, &format!("{suffix}-{attempt}"));
            attempt += 1;
        }
        tokio::fs::rename(&self.path, &backup).await?;
        warn!("Moved corrupted data file to {:?}", backup);
        Ok(backup)
    }

    async fn write(&self, counts: &DayCounts) -> Result<()> {
        let mut buffer = Vec::<u8>::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        counts.serialize(&mut serializer)?;
        buffer.push(b'\n');

        replace_file(&self.path, &buffer).await?;
        Ok(())
    }
}

impl CounterStorage for JsonCounterStorage {
    async fn load(&self) -> Result<DayCounts> {
        self.ensure_parent().await?;
        let lock = FileLock::exclusive(&self.path).await?;
        let result = self.load_inner().await;
        lock.release().await?;
        let counts = result?;
        debug!("Loaded {} days from {:?}", counts.len(), self.path);
        Ok(counts)
    }

    async fn flush(&self, counts: &DayCounts) -> Result<()> {
        self.ensure_parent().await?;
        let lock = FileLock::exclusive(&self.path).await?;
        let result = self.write(counts).await;
        lock.release().await?;
        result
    }
}
