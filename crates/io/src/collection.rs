//! The spreadsheet collection index.
//!
//! A single JSON file lists every saved spreadsheet as `{id, name, data}`,
//! where `data` is an embedded snapshot blob (see [`crate::json`]). Order
//! is preserved; the first entry is the one opened on startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetEntry {
    pub id: String,
    pub name: String,
    /// Embedded snapshot blob, opaque at this level.
    pub data: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpreadsheetCollection {
    entries: Vec<SpreadsheetEntry>,
}

impl SpreadsheetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index file. A missing file is an empty collection, not an
    /// error; a corrupt one is.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)?;
        let entries = serde_json::from_str(&contents)?;
        Ok(Self { entries })
    }

    /// Write the index file, going through a sibling temp file so a crash
    /// mid-write can't truncate the existing index.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string(&self.entries)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn entries(&self) -> &[SpreadsheetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&SpreadsheetEntry> {
        self.entries.first()
    }

    pub fn get(&self, id: &str) -> Option<&SpreadsheetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Replace the entry with a matching id, or append a new one.
    pub fn upsert(&mut self, entry: SpreadsheetEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Rename an entry. Returns false if the id is unknown.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove an entry. Returns false if the id is unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}
