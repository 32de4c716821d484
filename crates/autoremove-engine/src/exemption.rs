//! Exemption filter: splits finished items into active and exempt sets

use crate::store::IgnoreState;
use autoremove_domain::Item;

/// Why an item is exempt from removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExemptReason {
    /// The ignore flag is set for the item
    Ignored,
    /// A tracker URL matched this exempt tracker pattern
    Tracker(String),
    /// A label matched this exempt label pattern
    Label(String),
}

/// Result of [`partition`]
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Finished items eligible for removal, in input order
    pub active: Vec<Item>,
    /// Finished items that are exempt, in input order
    pub exempt: Vec<Item>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Find the first reason an item is exempt, if any
///
/// Label patterns are only consulted when the label feature is enabled.
pub fn exemption_reason(
    item: &Item,
    state: &IgnoreState,
    exempt_trackers: &[String],
    exempt_labels: &[String],
    labels_enabled: bool,
) -> Option<ExemptReason> {
    if state.is_ignored(&item.id) {
        return Some(ExemptReason::Ignored);
    }

    for url in &item.trackers {
        if let Some(pattern) = exempt_trackers.iter().find(|p| contains_ignore_case(url, p)) {
            return Some(ExemptReason::Tracker(pattern.clone()));
        }
    }

    if labels_enabled {
        for label in &item.labels {
            if let Some(pattern) = exempt_labels.iter().find(|p| contains_ignore_case(label, p)) {
                return Some(ExemptReason::Label(pattern.clone()));
            }
        }
    }

    None
}

/// Partition items into active and exempt, dropping unfinished ones
pub fn partition(
    items: Vec<Item>,
    state: &IgnoreState,
    exempt_trackers: &[String],
    exempt_labels: &[String],
    labels_enabled: bool,
) -> Partition {
    let mut result = Partition::default();

    for item in items {
        if !item.finished {
            continue;
        }

        match exemption_reason(&item, state, exempt_trackers, exempt_labels, labels_enabled) {
            Some(reason) => {
                tracing::debug!(id = %item.id, ?reason, "Item is exempt");
                result.exempt.push(item);
            }
            None => result.active.push(item),
        }
    }

    result
}
