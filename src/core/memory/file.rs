//! Persistent storage for the treatment memory.
//!
//! Stores the memory as a pretty-printed JSON file next to the host's save.

use std::fs;
use std::path::{Path, PathBuf};

use super::store::TreatmentMemory;
use crate::core::error::Result;

/// A treatment memory save file.
pub struct MemoryFile {
    path: PathBuf,
}

impl MemoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the memory from disk. A missing file is a fresh session.
    pub fn load(&self) -> Result<TreatmentMemory> {
        if !self.path.exists() {
            return Ok(TreatmentMemory::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let memory = TreatmentMemory::from_json(&content)?;
        log::debug!("Loaded {} treatment record(s) from {:?}", memory.len(), self.path);
        Ok(memory)
    }

    pub fn save(&self, memory: &TreatmentMemory) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, memory.to_json()?)?;
        Ok(())
    }
}
