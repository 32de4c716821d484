//! Whole-document persistence for configuration and ignore flags
//!
//! Each document is rewritten in full after a mutation. Writes go to a
//! sibling temp file that is renamed over the target, so a reader never sees
//! a torn document.

use crate::error::StoreError;
use autoremove_domain::ItemId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// On-disk encoding of a document, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `serde_json`, pretty printed
    Json,
    /// `toml`, pretty printed
    Toml,
}

impl DocumentFormat {
    /// `.toml` files are TOML, everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }
}

/// A file-backed, whole-document store for one serializable value
#[derive(Debug, Clone)]
pub struct Document<T> {
    path: PathBuf,
    format: DocumentFormat,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Document<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Create a handle for the document at `path`; nothing is read yet
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            format: DocumentFormat::from_path(&path),
            path,
            _marker: PhantomData,
        }
    }

    /// Location of the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, `None` if it does not exist yet
    pub fn load(&self) -> Result<Option<T>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let value = match self.format {
            DocumentFormat::Json => serde_json::from_str(&contents)?,
            DocumentFormat::Toml => toml::from_str(&contents)?,
        };
        Ok(Some(value))
    }

    /// Read the document, falling back to `T::default()` when it is missing
    pub fn load_or_default(&self) -> Result<T, StoreError> {
        Ok(self.load()?.unwrap_or_default())
    }

    /// Overwrite the document with `value`
    pub fn save(&self, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let contents = match self.format {
            DocumentFormat::Json => serde_json::to_string_pretty(value)?,
            DocumentFormat::Toml => toml::to_string_pretty(value)?,
        };

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Per-item ignore flags
///
/// Absence of an entry means "not ignored". Entries are dropped when the
/// engine removes the item from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreState {
    flags: BTreeMap<String, bool>,
}

impl IgnoreState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the item is flagged as ignored
    pub fn is_ignored(&self, id: &ItemId) -> bool {
        self.flags.get(id.as_str()).copied().unwrap_or(false)
    }

    /// Set the flag for one item
    pub fn set(&mut self, id: &ItemId, ignored: bool) {
        self.flags.insert(id.as_str().to_string(), ignored);
    }

    /// Drop the entry for an item; returns whether one existed
    pub fn remove(&mut self, id: &ItemId) -> bool {
        self.flags.remove(id.as_str()).is_some()
    }

    /// Flags for several items, in the given order
    pub fn get_many(&self, ids: &[ItemId]) -> Vec<bool> {
        ids.iter().map(|id| self.is_ignored(id)).collect()
    }

    /// Set the same flag on several items
    pub fn set_many(&mut self, ids: &[ItemId], ignored: bool) {
        for id in ids {
            self.set(id, ignored);
        }
    }

    /// Number of stored entries (true or false)
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no entries are stored
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Iterate over the ids currently flagged as ignored
    pub fn ignored_ids(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, ignored)| **ignored)
            .map(|(id, _)| id.as_str())
    }
}
