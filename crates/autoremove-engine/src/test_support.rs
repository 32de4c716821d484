//! In-memory host shared by the unit tests

use autoremove_domain::{Item, ItemHost, ItemId};
use std::collections::{HashMap, HashSet};

/// Mock host registry recording every action it receives
#[derive(Debug, Default)]
pub(crate) struct MockHost {
    pub items: Vec<Item>,
    pub labels: HashMap<String, String>,
    pub labels_enabled: bool,
    pub label_error: bool,
    pub free_space_gb: f64,
    pub fail_actions: HashSet<String>,
    pub paused: Vec<ItemId>,
    pub removed: Vec<(ItemId, bool)>,
}

impl MockHost {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, id: &str, label: &str) -> Self {
        self.labels_enabled = true;
        self.labels.insert(id.to_string(), label.to_string());
        self
    }

    pub fn removed_ids(&self) -> Vec<&str> {
        self.removed.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn paused_ids(&self) -> Vec<&str> {
        self.paused.iter().map(|id| id.as_str()).collect()
    }
}

impl ItemHost for MockHost {
    type Error = String;

    fn list_item_ids(&self) -> Result<Vec<ItemId>, Self::Error> {
        Ok(self.items.iter().map(|i| i.id.clone()).collect())
    }

    fn get_item(&self, id: &ItemId) -> Result<Option<Item>, Self::Error> {
        Ok(self.items.iter().find(|i| &i.id == id).cloned())
    }

    fn get_label(&self, id: &ItemId) -> Result<Option<String>, Self::Error> {
        if self.label_error {
            return Err("label plugin exploded".to_string());
        }
        Ok(self.labels.get(id.as_str()).cloned())
    }

    fn free_space_gb(&self) -> Result<f64, Self::Error> {
        Ok(self.free_space_gb)
    }

    fn pause_item(&mut self, id: &ItemId) -> Result<(), Self::Error> {
        if self.fail_actions.contains(id.as_str()) {
            return Err(format!("cannot pause {}", id));
        }
        self.paused.push(id.clone());
        Ok(())
    }

    fn remove_item(&mut self, id: &ItemId, remove_data: bool) -> Result<(), Self::Error> {
        if self.fail_actions.contains(id.as_str()) {
            return Err(format!("cannot remove {}", id));
        }
        if let Some(pos) = self.items.iter().position(|i| &i.id == id) {
            let item = self.items.remove(pos);
            if remove_data {
                self.free_space_gb += item.size_gb();
            }
        }
        self.removed.push((id.clone(), remove_data));
        Ok(())
    }

    fn label_feature_enabled(&self) -> bool {
        self.labels_enabled
    }
}

/// Bytes for a whole number of GB
pub(crate) fn gb(n: u64) -> u64 {
    n * 1_073_741_824
}
