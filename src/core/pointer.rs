//! Persisted current-clip pointer.
//!
//! A single-value file overwritten with the clip most recently assigned to an
//! outbound call. It lets an operator (or a restarted process) see what was
//! being called last; the in-memory pointer in the orchestrator stays the
//! source of truth while the process runs.

use std::io;
use std::path::{Path, PathBuf};

use super::clip::ClipRef;

#[derive(Debug, Clone)]
pub struct PointerStore {
    path: PathBuf,
}

impl PointerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, clip: &ClipRef) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, clip.as_str())
    }

    /// Read the last persisted clip, `None` if the file is missing or blank.
    pub fn load(&self) -> io::Result<Option<ClipRef>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                Ok((!trimmed.is_empty()).then(|| ClipRef::from(trimmed)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
