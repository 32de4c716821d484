//! JSON snapshot of a host registry, usable as an [`ItemHost`].
//!
//! The snapshot file describes items, their labels, and the free space on the
//! download volume. Pause and remove actions are written back to the file.

use autoremove_domain::{Item, ItemHost, ItemId};
use autoremove_engine::{Document, StoreError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised by the snapshot host.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the snapshot failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The id is not in the snapshot
    #[error("Unknown item: {0}")]
    UnknownItem(String),
}

fn default_true() -> bool {
    true
}

/// One item as stored in the snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    /// Host identifier
    pub id: String,

    /// Display name; the id is used when empty
    #[serde(default)]
    pub name: String,

    /// Download finished
    #[serde(default = "default_true")]
    pub finished: bool,

    /// Paused by a previous pass
    #[serde(default)]
    pub paused: bool,

    /// Tracker URLs
    #[serde(default)]
    pub trackers: Vec<String>,

    /// Label, if the label feature is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Upload / download ratio
    #[serde(default)]
    pub ratio: f64,

    /// Hours since added
    #[serde(default)]
    pub age_hours: f64,

    /// Hours spent seeding
    #[serde(default)]
    pub seeding_hours: f64,

    /// Known seeders
    #[serde(default)]
    pub seeders: u32,

    /// Payload size in bytes
    #[serde(default)]
    pub size_bytes: u64,
}

impl SnapshotItem {
    /// Build the engine's view of this item (labels are attached by the engine).
    pub fn to_item(&self) -> Item {
        let mut item = Item::new(self.id.as_str())
            .with_finished(self.finished)
            .with_ratio(self.ratio)
            .with_age_hours(self.age_hours)
            .with_seeding_hours(self.seeding_hours)
            .with_seeders(self.seeders)
            .with_size_bytes(self.size_bytes);
        if !self.name.is_empty() {
            item.name = self.name.clone();
        }
        item.trackers = self.trackers.clone();
        item
    }
}

/// Contents of a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Free space on the download volume, in GB
    #[serde(default)]
    pub free_space_gb: f64,

    /// Whether labels are available
    #[serde(default)]
    pub label_feature: bool,

    /// Items in host order
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

/// File-backed host registry.
pub struct SnapshotHost {
    document: Document<Snapshot>,
    snapshot: Snapshot,
}

impl SnapshotHost {
    /// Load the snapshot at `path`; a missing file is an empty registry.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let document = Document::new(path);
        let snapshot: Snapshot = document.load_or_default()?;
        tracing::debug!(
            path = %document.path().display(),
            items = snapshot.items.len(),
            "Loaded snapshot"
        );
        Ok(Self { document, snapshot })
    }

    /// Current contents.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn find(&self, id: &ItemId) -> Option<&SnapshotItem> {
        self.snapshot.items.iter().find(|i| i.id == id.as_str())
    }

    /// Save `next`, keeping it in memory only once it is on disk
    fn commit(&mut self, next: Snapshot) -> Result<(), SnapshotError> {
        self.document.save(&next)?;
        self.snapshot = next;
        Ok(())
    }
}

impl ItemHost for SnapshotHost {
    type Error = SnapshotError;

    fn list_item_ids(&self) -> Result<Vec<ItemId>, Self::Error> {
        Ok(self.snapshot.items.iter().map(|i| ItemId::new(i.id.as_str())).collect())
    }

    fn get_item(&self, id: &ItemId) -> Result<Option<Item>, Self::Error> {
        Ok(self.find(id).map(SnapshotItem::to_item))
    }

    fn get_label(&self, id: &ItemId) -> Result<Option<String>, Self::Error> {
        Ok(self.find(id).and_then(|i| i.label.clone()))
    }

    fn free_space_gb(&self) -> Result<f64, Self::Error> {
        Ok(self.snapshot.free_space_gb)
    }

    fn pause_item(&mut self, id: &ItemId) -> Result<(), Self::Error> {
        let mut next = self.snapshot.clone();
        let item = next
            .items
            .iter_mut()
            .find(|i| i.id == id.as_str())
            .ok_or_else(|| SnapshotError::UnknownItem(id.to_string()))?;
        item.paused = true;
        self.commit(next)
    }

    fn remove_item(&mut self, id: &ItemId, remove_data: bool) -> Result<(), Self::Error> {
        let mut next = self.snapshot.clone();
        let pos = next
            .items
            .iter()
            .position(|i| i.id == id.as_str())
            .ok_or_else(|| SnapshotError::UnknownItem(id.to_string()))?;
        let removed = next.items.remove(pos);
        if remove_data {
            next.free_space_gb += removed.to_item().size_gb();
        }
        self.commit(next)
    }

    fn label_feature_enabled(&self) -> bool {
        self.snapshot.label_feature
    }
}
