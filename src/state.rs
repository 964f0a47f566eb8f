//! File-backed record of the last applied zone state.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::NamedTempFile;

use crate::zone::ZoneDesiredState;

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing has been applied yet.
    pub fn load(&self) -> anyhow::Result<Option<ZoneDesiredState>> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read state {}", self.path.display()));
            }
        };
        let state = serde_json::from_str(&json)
            .with_context(|| format!("corrupt state file {}", self.path.display()))?;
        Ok(Some(state))
    }

    /// Write the state to a temporary file next to the target, then rename it into place.
    pub fn save(&self, state: &ZoneDesiredState) -> anyhow::Result<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent,
            None => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create state directory {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary state in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.as_file_mut()
            .sync_all()
            .with_context(|| format!("failed to flush state {}", self.path.display()))?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to write state {}", self.path.display()))?;
        Ok(())
    }

    pub fn remove(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e)
                .with_context(|| format!("failed to remove state {}", self.path.display())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
