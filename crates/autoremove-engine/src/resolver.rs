//! Rule resolver: collects the specific rules that apply to an item

use autoremove_domain::{Item, Rule};
use std::collections::BTreeMap;

/// Collect the tracker- and label-specific rules for an item
///
/// For every tracker URL (item order) and every tracker key (table order)
/// whose key is a case-insensitive substring of the URL, all rules under the
/// key are appended. Label rules follow, for labels that equal a key.
/// Duplicates are kept. The caller orders the result by combinator before
/// folding (see [`Rule::evaluate_all`]).
pub fn resolve(
    item: &Item,
    tracker_rules: &BTreeMap<String, Vec<Rule>>,
    label_rules: &BTreeMap<String, Vec<Rule>>,
) -> Vec<Rule> {
    let mut rules = Vec::new();

    for url in &item.trackers {
        let url = url.to_lowercase();
        for (key, key_rules) in tracker_rules {
            if url.contains(&key.to_lowercase()) {
                rules.extend_from_slice(key_rules);
            }
        }
    }

    if !label_rules.is_empty() {
        for label in &item.labels {
            if let Some(label_rules) = label_rules.get(label) {
                rules.extend_from_slice(label_rules);
            }
        }
    }

    rules
}
