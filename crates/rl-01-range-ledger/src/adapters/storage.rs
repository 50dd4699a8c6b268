//! Snapshot storage adapters.

use crate::error::{LedgerError, LedgerResult};
use crate::ports::SnapshotStore;
use parking_lot::RwLock;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keeps the latest snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    bytes: RwLock<Option<Vec<u8>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, bytes: &[u8]) -> LedgerResult<()> {
        *self.bytes.write() = Some(bytes.to_vec());
        Ok(())
    }

    fn load(&self) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self.bytes.read().clone())
    }
}

/// Stores the snapshot in a single file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

fn storage_error(path: &Path, e: io::Error) -> LedgerError {
    LedgerError::Storage {
        reason: format!("{}: {}", path.display(), e),
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, bytes: &[u8]) -> LedgerResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        let staging = self.staging_path();
        fs::write(&staging, bytes).map_err(|e| storage_error(&staging, e))?;
        fs::rename(&staging, &self.path).map_err(|e| storage_error(&self.path, e))?;
        debug!(
            "[rl-01] Wrote {} byte snapshot to {}",
            bytes.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> LedgerResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }
}
