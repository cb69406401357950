//! Shared key-value store used to hand values between the background and
//! popup contexts. Writes merge into the stored record; keys a write does not
//! mention are left untouched, and the last writer wins per key.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pages_logging::pages_debug;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::persist::{AtomicFileWriter, PersistError};

pub type Record = Map<String, Value>;

pub const RELAY_FILENAME: &str = "relay.json";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("relay store unavailable: {0}")]
    Unavailable(String),
    #[error("relay data is corrupt: {0}")]
    Corrupt(String),
}

impl From<PersistError> for RelayError {
    fn from(err: PersistError) -> Self {
        RelayError::Unavailable(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait StateRelay: Send + Sync {
    /// Returns the subset of `keys` that currently hold values.
    async fn get(&self, keys: &[&str]) -> Result<Record, RelayError>;

    /// Merges `patch` into the stored record. Resolves once the write is durable.
    async fn set(&self, patch: Record) -> Result<(), RelayError>;
}

fn select(record: &Record, keys: &[&str]) -> Record {
    keys.iter()
        .filter_map(|key| {
            record
                .get(*key)
                .map(|value| ((*key).to_string(), value.clone()))
        })
        .collect()
}

/// In-process relay for tests and single-process hosts.
#[derive(Debug, Default)]
pub struct MemoryRelay {
    entries: RwLock<Record>,
}

impl MemoryRelay {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StateRelay for MemoryRelay {
    async fn get(&self, keys: &[&str]) -> Result<Record, RelayError> {
        let entries = self.entries.read().await;
        Ok(select(&entries, keys))
    }

    async fn set(&self, patch: Record) -> Result<(), RelayError> {
        let mut entries = self.entries.write().await;
        entries.extend(patch);
        Ok(())
    }
}

/// Relay backed by a JSON file, shared by every process pointed at the same
/// directory. Writes are serialized within a process and land atomically.
/// File IO runs on the blocking pool so other in-flight tasks keep moving.
#[derive(Debug)]
pub struct FileRelay {
    writer: AtomicFileWriter,
    write_lock: Mutex<()>,
}

impl FileRelay {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(RELAY_FILENAME)
    }
}

fn read_record(path: &Path) -> Result<Record, RelayError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Record::new()),
        Err(err) => return Err(RelayError::Unavailable(err.to_string())),
    };
    if content.trim().is_empty() {
        return Ok(Record::new());
    }
    serde_json::from_str(&content).map_err(|err| RelayError::Corrupt(err.to_string()))
}

fn merge_into_file(writer: &AtomicFileWriter, patch: Record) -> Result<PathBuf, RelayError> {
    // Refuse to merge into unreadable data rather than replacing it.
    let mut record = read_record(&writer.dir().join(RELAY_FILENAME))?;
    record.extend(patch);

    let content = serde_json::to_string_pretty(&record)
        .map_err(|err| RelayError::Corrupt(err.to_string()))?;
    Ok(writer.write(RELAY_FILENAME, &content)?)
}

async fn run_blocking<T, F>(work: F) -> Result<T, RelayError>
where
    F: FnOnce() -> Result<T, RelayError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| RelayError::Unavailable(format!("relay io task failed: {err}")))?
}

#[async_trait::async_trait]
impl StateRelay for FileRelay {
    async fn get(&self, keys: &[&str]) -> Result<Record, RelayError> {
        let path = self.path();
        let record = run_blocking(move || read_record(&path)).await?;
        Ok(select(&record, keys))
    }

    async fn set(&self, patch: Record) -> Result<(), RelayError> {
        let _guard = self.write_lock.lock().await;
        let keys: Vec<String> = patch.keys().cloned().collect();
        let writer = self.writer.clone();
        let path = run_blocking(move || merge_into_file(&writer, patch)).await?;
        pages_debug!("relay wrote keys {:?} to {:?}", keys, path);
        Ok(())
    }
}
