//! Named blob storage backing the session store.

use super::error::{PersistenceError, PersistenceResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Key-value storage of string blobs.
///
/// Calls are synchronous and may block briefly on disk I/O. Blobs are a few
/// kilobytes of chat history, written once per turn from a single-user client.
pub trait BlobStore: Send + Sync {
    /// Read a blob. `Ok(None)` when it does not exist.
    fn read(&self, key: &str) -> PersistenceResult<Option<String>>;

    /// Write a blob, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> PersistenceResult<()>;

    /// Remove a blob. Removing a missing blob is not an error.
    fn remove(&self, key: &str) -> PersistenceResult<()>;
}

/// One JSON file per key under a directory.
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PersistenceResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

fn io_error(key: &str, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        key: key.to_string(),
        source,
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;

        // Write-then-rename so a crash never leaves a half-written blob.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_error(key, e))
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

/// In-memory blobs, for tests and for running without a writable disk.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail; reads still work.
    pub fn failing_writes() -> Self {
        Self {
            blobs: Mutex::default(),
            fail_writes: AtomicBool::new(true),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a raw blob, bypassing serialization.
    pub fn insert_raw(&self, key: &str, value: &str) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.to_string(), value.to_string());
        }
    }

    fn lock(&self) -> PersistenceResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.blobs
            .lock()
            .map_err(|_| PersistenceError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> PersistenceResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("writes disabled".to_string()));
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
