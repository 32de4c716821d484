//! Configuration for the selection engine
//!
//! Field names follow the persisted document keys (`max_seeds`, `filter`,
//! `sel_func`, ...) so existing configuration files load unchanged. Metric and
//! combinator names stay strings on disk and are resolved into a [`Policy`] at
//! the start of every pass, with unknown names falling back to defaults.

use crate::error::ConfigError;
use autoremove_domain::{Combinator, MetricKind, Rule};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// A persisted rule: `[combinator, metric, threshold]`
///
/// # Examples
///
/// ```
/// use autoremove_engine::RuleSpec;
///
/// let spec: RuleSpec = serde_json::from_str(r#"["or", "func_seed_time", 48]"#).unwrap();
/// assert_eq!(spec.2, 48.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec(pub String, pub String, pub f64);

impl RuleSpec {
    /// Build a spec from typed parts
    pub fn new(combinator: Combinator, metric: MetricKind, threshold: f64) -> Self {
        Self(combinator.as_str().to_string(), metric.as_str().to_string(), threshold)
    }

    /// Resolve into a domain rule, applying name fallbacks
    pub fn to_rule(&self) -> Rule {
        Rule::new(
            resolve_combinator(&self.0, "rule combinator"),
            resolve_metric(&self.1, "rule metric"),
            self.2,
        )
    }
}

/// Configuration for the selection engine
///
/// Controls the item floor, the two global rules, exemptions, specific
/// per-tracker / per-label rules, and the destructive-action gates.
///
/// # Examples
///
/// ```
/// use autoremove_engine::AutoRemoveConfig;
///
/// let config = AutoRemoveConfig::default();
/// assert_eq!(config.max_allowed, 0);
/// assert_eq!(config.filter_primary, "func_seed_time");
/// assert!(!config.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoRemoveConfig {
    /// Number of items always kept; negative disables every action
    #[serde(rename = "max_seeds")]
    pub max_allowed: i64,

    /// Metric name for the primary sort key and global rule 1
    #[serde(rename = "filter")]
    pub filter_primary: String,

    /// Count exempt items toward `max_allowed`
    pub count_exempt: bool,

    /// Delete payload data when removing
    pub remove_data: bool,

    /// Tracker substrings that exempt an item (case-insensitive)
    #[serde(rename = "trackers")]
    pub exempt_trackers: Vec<String>,

    /// Label substrings that exempt an item (case-insensitive)
    #[serde(rename = "labels")]
    pub exempt_labels: Vec<String>,

    /// Threshold for global rule 1
    #[serde(rename = "min")]
    pub min_primary: f64,

    /// Hours between passes
    #[serde(rename = "interval")]
    pub check_interval_hours: f64,

    /// Combinator merging global rules 1 and 2 when both are enabled
    #[serde(rename = "sel_func")]
    pub combinator: String,

    /// Metric name for the secondary sort key and global rule 2
    #[serde(rename = "filter2")]
    pub filter_secondary: String,

    /// Threshold for global rule 2
    #[serde(rename = "min2")]
    pub min_secondary: f64,

    /// Free space target in GB; negative disables space gating
    #[serde(rename = "hdd_space")]
    pub min_free_space_gb: f64,

    /// Remove qualifying items; when false they are paused instead
    #[serde(rename = "remove")]
    pub act_on_removal: bool,

    /// Master switch for any pause/remove action
    pub enabled: bool,

    /// Global rule 1 switch
    pub rule_1_enabled: bool,

    /// Global rule 2 switch
    pub rule_2_enabled: bool,

    /// Decide and log without touching the host or the ignore state
    pub dry_run: bool,

    /// Tracker substring → specific rules
    pub tracker_rules: BTreeMap<String, Vec<RuleSpec>>,

    /// Label → specific rules
    pub label_rules: BTreeMap<String, Vec<RuleSpec>>,
}

impl Default for AutoRemoveConfig {
    /// Defaults match a freshly installed plugin: nothing is acted on until
    /// `enabled` is switched on.
    fn default() -> Self {
        Self {
            max_allowed: 0,
            filter_primary: MetricKind::SeedTimeHours.as_str().to_string(),
            count_exempt: false,
            remove_data: true,
            exempt_trackers: Vec::new(),
            exempt_labels: Vec::new(),
            min_primary: 0.0,
            check_interval_hours: 1.0,
            combinator: Combinator::And.as_str().to_string(),
            filter_secondary: MetricKind::Ratio.as_str().to_string(),
            min_secondary: 0.0,
            min_free_space_gb: 10.0,
            act_on_removal: true,
            enabled: false,
            rule_1_enabled: true,
            rule_2_enabled: false,
            dry_run: false,
            tracker_rules: BTreeMap::new(),
            label_rules: BTreeMap::new(),
        }
    }
}

/// Typed view of the name-based parts of a configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    /// Primary metric (sort key 1, global rule 1)
    pub primary: MetricKind,
    /// Secondary metric (sort key 2, global rule 2)
    pub secondary: MetricKind,
    /// Merges the two global rules
    pub combinator: Combinator,
    /// Tracker substring → rules, in key order
    pub tracker_rules: BTreeMap<String, Vec<Rule>>,
    /// Label → rules
    pub label_rules: BTreeMap<String, Vec<Rule>>,
}

fn resolve_metric(name: &str, key: &str) -> MetricKind {
    MetricKind::parse(name).unwrap_or_else(|| {
        tracing::debug!(name, key, "Unknown metric, falling back to ratio");
        MetricKind::default()
    })
}

fn resolve_combinator(name: &str, key: &str) -> Combinator {
    Combinator::parse(name).unwrap_or_else(|| {
        tracing::debug!(name, key, "Unknown combinator, falling back to and");
        Combinator::default()
    })
}

fn resolve_table(table: &BTreeMap<String, Vec<RuleSpec>>) -> BTreeMap<String, Vec<Rule>> {
    table
        .iter()
        .map(|(key, specs)| (key.clone(), specs.iter().map(RuleSpec::to_rule).collect()))
        .collect()
}

impl AutoRemoveConfig {
    /// Resolve metric and combinator names into a typed policy
    pub fn policy(&self) -> Policy {
        Policy {
            primary: resolve_metric(&self.filter_primary, "filter"),
            secondary: resolve_metric(&self.filter_secondary, "filter2"),
            combinator: resolve_combinator(&self.combinator, "sel_func"),
            tracker_rules: resolve_table(&self.tracker_rules),
            label_rules: resolve_table(&self.label_rules),
        }
    }

    /// Get the check interval as Duration
    ///
    /// Falls back to one hour when the stored value is not a positive number.
    pub fn check_interval(&self) -> Duration {
        let secs = self.check_interval_hours * 3600.0;
        if secs.is_finite() && secs >= 1.0 {
            Duration::from_secs_f64(secs)
        } else {
            Duration::from_secs(3600)
        }
    }

    /// Reject values that cannot drive a pass
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.check_interval_hours.is_finite() && self.check_interval_hours > 0.0) {
            return Err(ConfigError::Invalid {
                key: "interval",
                reason: format!("must be a positive number of hours, got {}", self.check_interval_hours),
            });
        }

        for (key, value) in [
            ("min", self.min_primary),
            ("min2", self.min_secondary),
            ("hdd_space", self.min_free_space_gb),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("must be finite, got {}", value),
                });
            }
        }

        Ok(())
    }

    /// Replace every value `validate` would reject with its default
    ///
    /// Used on stored documents, where a hand-edited value must not keep the
    /// service from starting.
    pub fn repaired(mut self) -> Self {
        let defaults = Self::default();

        if !(self.check_interval_hours.is_finite() && self.check_interval_hours > 0.0) {
            tracing::warn!(
                key = "interval",
                value = self.check_interval_hours,
                default = defaults.check_interval_hours,
                "Invalid stored value, using default"
            );
            self.check_interval_hours = defaults.check_interval_hours;
        }

        for (key, value, default) in [
            ("min", &mut self.min_primary, defaults.min_primary),
            ("min2", &mut self.min_secondary, defaults.min_secondary),
            ("hdd_space", &mut self.min_free_space_gb, defaults.min_free_space_gb),
        ] {
            if !value.is_finite() {
                tracing::warn!(key, value = *value, default, "Invalid stored value, using default");
                *value = default;
            }
        }

        self
    }

    /// Merge a set of persisted keys into a copy of this configuration
    ///
    /// Keys that are not part of the configuration are logged and ignored.
    /// The result is validated.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut current = serde_json::to_value(self).map_err(|e| ConfigError::Merge(e.to_string()))?;

        let Value::Object(fields) = &mut current else {
            return Err(ConfigError::Merge("configuration is not an object".to_string()));
        };

        for (key, value) in patch {
            if fields.contains_key(key) {
                fields.insert(key.clone(), value.clone());
            } else {
                tracing::warn!(key = key.as_str(), "Ignoring unknown configuration key");
            }
        }

        let merged: Self = serde_json::from_value(current).map_err(|e| ConfigError::Merge(e.to_string()))?;
        merged.validate()?;
        Ok(merged)
    }
}

/// Map of persisted metric name → display name
pub fn remove_rule_catalog() -> BTreeMap<&'static str, &'static str> {
    MetricKind::ALL
        .iter()
        .map(|kind| (kind.as_str(), kind.display_name()))
        .collect()
}
