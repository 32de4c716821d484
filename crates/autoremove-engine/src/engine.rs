//! Core selection engine: decides which items to remove or pause

use crate::config::{AutoRemoveConfig, Policy};
use crate::exemption;
use crate::metrics::EngineMetrics;
use crate::report::{Action, Decision, Outcome, PassReport, PassStatus, RuleSource, SkipReason};
use crate::resolver;
use crate::store::IgnoreState;
use crate::EngineError;
use autoremove_domain::{Item, ItemHost, ItemId, MetricKind, Rule};
use std::fmt::Display;
use std::time::Instant;

/// Stable ascending sort on `(primary, secondary)`
///
/// Items with equal keys keep their input order. NaN of either sign ranks as
/// positive infinity, so it sorts last.
pub fn sort_by_metrics(items: Vec<Item>, primary: MetricKind, secondary: MetricKind) -> Vec<Item> {
    let key = |value: f64| if value.is_nan() { f64::INFINITY } else { value };
    let mut keyed: Vec<(f64, f64, Item)> = items
        .into_iter()
        .map(|item| (key(primary.extract(&item)), key(secondary.extract(&item)), item))
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
    keyed.into_iter().map(|(_, _, item)| item).collect()
}

/// Decide whether an item should be removed
///
/// Specific rules, when any apply, completely override the two global rules.
pub fn removal_condition(item: &Item, config: &AutoRemoveConfig, policy: &Policy) -> (bool, RuleSource) {
    let specific = resolver::resolve(item, &policy.tracker_rules, &policy.label_rules);
    if let Some(result) = Rule::evaluate_all(&specific, item) {
        return (result, RuleSource::Specific(specific.len()));
    }

    let test_1 = policy.primary.extract(item) >= config.min_primary;
    let test_2 = policy.secondary.extract(item) >= config.min_secondary;

    let result = match (config.rule_1_enabled, config.rule_2_enabled) {
        (true, true) => policy.combinator.combine(test_1, test_2),
        (true, false) => test_1,
        (false, true) => test_2,
        (false, false) => false,
    };
    (result, RuleSource::Global)
}

/// Selection engine for periodic remove / pause passes
///
/// Responsible for:
/// - Skipping passes while the item count is within `max_allowed`
/// - Separating exempt items and ranking the rest
/// - Evaluating the removal condition for every item past the cap
/// - Gating host actions on `enabled` and the free-space deficit
/// - Collecting metrics across passes
///
/// # Examples
///
/// ```no_run
/// use autoremove_engine::{AutoRemoveConfig, IgnoreState, SelectionEngine};
/// # use autoremove_domain::ItemHost;
///
/// # fn run<H: ItemHost>(host: &mut H) -> Result<(), Box<dyn std::error::Error>>
/// # where H::Error: std::fmt::Display {
/// let mut engine = SelectionEngine::new();
/// let mut state = IgnoreState::new();
/// let report = engine.run_pass(host, &AutoRemoveConfig::default(), &mut state)?;
/// println!("removed {} item(s)", report.removed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SelectionEngine {
    metrics: EngineMetrics,
}

impl SelectionEngine {
    /// Create a new engine with empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Run one evaluation pass
    ///
    /// This is the main entry point. It:
    /// 1. Checks the `max_allowed` gates
    /// 2. Splits exempt items from active ones
    /// 3. Ranks active items and walks the tail in reverse
    /// 4. Removes or pauses qualifying items while the gate is open
    ///
    /// The ignore state is updated in place; the caller saves it when the
    /// report says `changed`. Only failing to list items or to read free space
    /// aborts the pass.
    pub fn run_pass<H: ItemHost>(
        &mut self,
        host: &mut H,
        config: &AutoRemoveConfig,
        state: &mut IgnoreState,
    ) -> Result<PassReport, EngineError>
    where
        H::Error: Display,
    {
        let start = Instant::now();
        let report = self.evaluate(host, config, state)?;

        self.metrics.record_pass(&report);
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        Ok(report)
    }

    fn evaluate<H: ItemHost>(
        &mut self,
        host: &mut H,
        config: &AutoRemoveConfig,
        state: &mut IgnoreState,
    ) -> Result<PassReport, EngineError>
    where
        H::Error: Display,
    {
        let max_allowed = config.max_allowed;

        // Negative max means unlimited items are allowed
        if max_allowed < 0 {
            tracing::info!("No actions performed: max_seeds < 0");
            return Ok(PassReport::skipped(SkipReason::Unlimited));
        }

        let ids = host
            .list_item_ids()
            .map_err(|e| EngineError::Host(format!("failed to list items: {}", e)))?;
        tracing::debug!(count = ids.len(), "Listed items");

        if ids.len() as i64 <= max_allowed {
            tracing::info!(total = ids.len(), max_allowed, "No actions performed: item count within max_seeds");
            return Ok(PassReport::skipped(SkipReason::BelowLimit {
                total: ids.len(),
                max_allowed,
            }));
        }

        let labels_enabled = host.label_feature_enabled();
        if !labels_enabled {
            tracing::debug!("Label feature not active, labels are not checked");
        }

        let items = gather_items(host, &ids, labels_enabled);
        let partition = exemption::partition(
            items,
            state,
            &config.exempt_trackers,
            &config.exempt_labels,
            labels_enabled,
        );
        let (active, exempt) = (partition.active, partition.exempt);
        tracing::debug!(active = active.len(), exempt = exempt.len(), "Partitioned finished items");

        let counted = active.len() + if config.count_exempt { exempt.len() } else { 0 };
        if counted as i64 <= max_allowed {
            tracing::info!(counted, max_allowed, "No actions performed: non-exempt items within max_seeds");
            return Ok(PassReport::skipped(SkipReason::BelowLimitAfterExemptions {
                counted,
                max_allowed,
            }));
        }

        // Exempt items counted toward the maximum come off the top of the allowance
        let effective_max = if config.count_exempt {
            (max_allowed - exempt.len() as i64).max(0)
        } else {
            max_allowed
        };
        let effective_max = effective_max as usize;

        let policy = config.policy();
        let mut ranked = sort_by_metrics(active, policy.primary, policy.secondary);
        let active_items = ranked.len();
        let candidates = ranked.split_off(effective_max.min(ranked.len()));

        let mut needed_space = if config.min_free_space_gb < 0.0 {
            None
        } else {
            let free = host
                .free_space_gb()
                .map_err(|e| EngineError::Host(format!("failed to read free space: {}", e)))?;
            Some(config.min_free_space_gb - free)
        };
        let needed_space_before = needed_space;

        let mut report = PassReport {
            status: PassStatus::Completed,
            dry_run: config.dry_run,
            total_items: ids.len(),
            active_items,
            exempt_items: exempt.len(),
            effective_max,
            needed_space_before,
            needed_space_after: None,
            decisions: Vec::with_capacity(candidates.len()),
            changed: false,
        };

        // Worst-ranked first, so they consume the space budget first
        for item in candidates.into_iter().rev() {
            let size_gb = item.size_gb();
            let (qualifies, source) = removal_condition(&item, config, &policy);
            let gate_open = config.enabled && needed_space.is_none_or(|needed| needed > 0.0);

            tracing::debug!(
                id = %item.id,
                name = item.name.as_str(),
                size_gb,
                ?needed_space,
                qualifies,
                gate_open,
                "Processing candidate"
            );

            let outcome = if !qualifies {
                Outcome::Kept
            } else if !gate_open {
                Outcome::Held
            } else {
                let action = if config.act_on_removal {
                    Action::Remove {
                        remove_data: config.remove_data,
                    }
                } else {
                    Action::Pause
                };
                self.apply(host, &item.id, action, config.dry_run)
            };

            if let Outcome::Applied {
                action: Action::Remove { remove_data },
            } = outcome
            {
                if let (true, Some(needed)) = (remove_data, needed_space.as_mut()) {
                    *needed -= size_gb;
                }
                if !config.dry_run {
                    state.remove(&item.id);
                    report.changed = true;
                }
            }

            report.decisions.push(Decision {
                primary: policy.primary.extract(&item),
                secondary: policy.secondary.extract(&item),
                id: item.id,
                name: item.name,
                size_gb,
                source,
                qualifies,
                outcome,
            });
        }

        report.needed_space_after = needed_space;

        tracing::info!(
            removed = report.removed(),
            paused = report.paused(),
            held = report.held(),
            failed = report.failed(),
            dry_run = config.dry_run,
            "Pass completed"
        );

        Ok(report)
    }

    fn apply<H: ItemHost>(&self, host: &mut H, id: &ItemId, action: Action, dry_run: bool) -> Outcome
    where
        H::Error: Display,
    {
        if dry_run {
            tracing::info!(%id, ?action, "DRY RUN: would act on item");
            return Outcome::Applied { action };
        }

        let result = match action {
            Action::Pause => host.pause_item(id),
            Action::Remove { remove_data } => host.remove_item(id, remove_data),
        };

        match result {
            Ok(()) => {
                tracing::info!(%id, ?action, "Acted on item");
                Outcome::Applied { action }
            }
            Err(e) => {
                tracing::warn!(%id, ?action, error = %e, "Problems acting on item");
                Outcome::Failed {
                    action,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Load snapshots for the listed ids, attaching labels when the feature is on
///
/// Items that vanished or fail to load are skipped; a failing label lookup
/// leaves the item unlabeled.
fn gather_items<H: ItemHost>(host: &H, ids: &[ItemId], labels_enabled: bool) -> Vec<Item>
where
    H::Error: Display,
{
    let mut items = Vec::with_capacity(ids.len());

    for id in ids {
        let mut item = match host.get_item(id) {
            Ok(Some(item)) => item,
            Ok(None) => {
                tracing::debug!(%id, "Item vanished before it could be read");
                continue;
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Cannot read item, skipping");
                continue;
            }
        };

        item.labels.clear();
        if labels_enabled {
            match host.get_label(id) {
                Ok(Some(label)) if !label.is_empty() => item.labels.push(label),
                Ok(_) => {}
                Err(e) => tracing::debug!(%id, error = %e, "Cannot obtain item label"),
            }
        }

        items.push(item);
    }

    items
}
