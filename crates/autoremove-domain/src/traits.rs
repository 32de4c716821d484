//! Trait definitions for external interactions
//!
//! The host registry owns the items; the engine only reads snapshots and asks
//! the host to pause or remove. Implementations live in other crates.

use crate::{Item, ItemId};

/// Trait for the registry that owns the managed items
///
/// Implemented by the infrastructure layer (a torrent client adapter, or the
/// snapshot file host in autoremove-cli).
pub trait ItemHost {
    /// Error type for host operations
    type Error;

    /// List every item currently in the registry, finished or not
    fn list_item_ids(&self) -> Result<Vec<ItemId>, Self::Error>;

    /// Get a snapshot of an item; `None` if it vanished since listing
    ///
    /// Labels are not filled in here; they come from [`ItemHost::get_label`].
    fn get_item(&self, id: &ItemId) -> Result<Option<Item>, Self::Error>;

    /// Get the label of an item, `None` or an empty string when unlabeled
    ///
    /// Fails when the label feature is not installed.
    fn get_label(&self, id: &ItemId) -> Result<Option<String>, Self::Error>;

    /// Free space on the download volume, in GB
    fn free_space_gb(&self) -> Result<f64, Self::Error>;

    /// Pause an item
    fn pause_item(&mut self, id: &ItemId) -> Result<(), Self::Error>;

    /// Remove an item, optionally deleting its data
    fn remove_item(&mut self, id: &ItemId, remove_data: bool) -> Result<(), Self::Error>;

    /// Whether the label feature is installed and enabled
    fn label_feature_enabled(&self) -> bool;
}
