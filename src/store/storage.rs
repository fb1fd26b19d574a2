//! Durable storage backends for the state document

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use fs2::FileExt;

use crate::error::StorageError;

/// Somewhere a whole serialized document can be read from and written to
///
/// Implementations must replace the document atomically: a reader sees either
/// the previous or the new document, never a mix.
pub trait DurableStorage: Send + 'static {
    /// Read the stored document, `None` if nothing was ever written
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored document
    fn write(&self, document: &str) -> Result<(), StorageError>;
}

/// JSON document on disk, replaced with temp file + rename
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DurableStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic write with file locking
    ///
    /// 1. Exclusive lock keeps two processes from interleaving writes
    /// 2. Temp file + rename means a crash leaves the old document intact
    fn write(&self, document: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Lock file is separate from the document so the rename can't drop it
        let lock_path = self.path.with_extension("json.lock");
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)?;
        lock_file
            .lock_exclusive()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        temp_file.write_all(document.as_bytes())?;
        temp_file.sync_all()?;

        std::fs::rename(&temp_path, &self.path)?;

        // Lock is released when lock_file is dropped
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    document: Option<String>,
    writes: usize,
    failing: bool,
}

/// In-memory storage; clones share the same document
///
/// Handy for tests and for running the engine without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a document
    pub fn with_document(document: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.lock().document = Some(document.into());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current document
    pub fn document(&self) -> Option<String> {
        self.lock().document.clone()
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Make subsequent writes fail (simulates a full disk)
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.document())
    }

    fn write(&self, document: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if inner.failing {
            return Err(StorageError::Rejected("storage quota exceeded".to_string()));
        }
        inner.document = Some(document.to_string());
        inner.writes += 1;
        Ok(())
    }
}
