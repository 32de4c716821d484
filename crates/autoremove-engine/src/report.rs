//! Per-pass decision report

use autoremove_domain::ItemId;
use serde::{Serialize, Serializer};

fn serialize_id<S: Serializer>(id: &ItemId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(id.as_str())
}

/// Why a pass stopped before evaluating candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// `max_allowed` is negative
    Unlimited,
    /// The host holds no more items than `max_allowed`
    BelowLimit {
        /// Items in the host registry
        total: usize,
        /// Configured floor
        max_allowed: i64,
    },
    /// After exemptions the counted items fit under `max_allowed`
    BelowLimitAfterExemptions {
        /// Active items, plus exempt ones when they count
        counted: usize,
        /// Configured floor
        max_allowed: i64,
    },
    /// Another pass was still running
    PassInFlight,
}

impl SkipReason {
    /// Short stable name, used as a metrics key
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Unlimited => "unlimited",
            SkipReason::BelowLimit { .. } => "below_limit",
            SkipReason::BelowLimitAfterExemptions { .. } => "below_limit_after_exemptions",
            SkipReason::PassInFlight => "pass_in_flight",
        }
    }
}

/// Terminal state of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    /// Nothing was evaluated
    Skipped(SkipReason),
    /// Candidates were evaluated
    Completed,
}

/// Host action taken (or, in dry-run, that would be taken) for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Pause the item
    Pause,
    /// Remove the item
    Remove {
        /// Payload data is deleted too
        remove_data: bool,
    },
}

/// What happened to a candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The removal condition was false
    Kept,
    /// The removal condition held but the enabled / free-space gate was closed
    Held,
    /// The action succeeded (or was simulated in dry-run)
    Applied {
        /// Action taken
        action: Action,
    },
    /// The host refused the action; the item is reconsidered next pass
    Failed {
        /// Action attempted
        action: Action,
        /// Host error text
        error: String,
    },
}

/// Which rules decided a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    /// Tracker / label specific rules (count) overrode the global rules
    Specific(usize),
    /// The global rule 1 / rule 2 logic
    Global,
}

/// Decision for one candidate, in processing order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    /// Item identifier
    #[serde(serialize_with = "serialize_id")]
    pub id: ItemId,
    /// Item name
    pub name: String,
    /// Primary sort metric value
    pub primary: f64,
    /// Secondary sort metric value
    pub secondary: f64,
    /// Payload size in GB
    pub size_gb: f64,
    /// Which rules were consulted
    pub source: RuleSource,
    /// Result of the removal condition
    pub qualifies: bool,
    /// What happened
    pub outcome: Outcome,
}

/// Everything a pass decided
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassReport {
    /// Terminal state
    pub status: PassStatus,
    /// Whether host actions were only simulated
    pub dry_run: bool,
    /// Items listed by the host
    pub total_items: usize,
    /// Finished, non-exempt items
    pub active_items: usize,
    /// Finished, exempt items
    pub exempt_items: usize,
    /// Number of best-ranked active items that were kept unconditionally
    pub effective_max: usize,
    /// Space deficit in GB before the candidate loop; `None` when space gating is off
    pub needed_space_before: Option<f64>,
    /// Space deficit in GB after the candidate loop
    pub needed_space_after: Option<f64>,
    /// Candidate decisions, worst-ranked first
    pub decisions: Vec<Decision>,
    /// Whether ignore state was modified and must be saved
    pub changed: bool,
}

impl PassReport {
    /// Report for a pass that stopped early
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            status: PassStatus::Skipped(reason),
            dry_run: false,
            total_items: 0,
            active_items: 0,
            exempt_items: 0,
            effective_max: 0,
            needed_space_before: None,
            needed_space_after: None,
            decisions: Vec::new(),
            changed: false,
        }
    }

    /// Whether the pass was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, PassStatus::Skipped(_))
    }

    fn count_applied(&self, pred: impl Fn(&Action) -> bool) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(&d.outcome, Outcome::Applied { action } if pred(action)))
            .count()
    }

    /// Number of items removed
    pub fn removed(&self) -> usize {
        self.count_applied(|a| matches!(a, Action::Remove { .. }))
    }

    /// Number of items paused
    pub fn paused(&self) -> usize {
        self.count_applied(|a| matches!(a, Action::Pause))
    }

    /// Number of failed host actions
    pub fn failed(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d.outcome, Outcome::Failed { .. }))
            .count()
    }

    /// Number of qualifying candidates held back by the gate
    pub fn held(&self) -> usize {
        self.decisions.iter().filter(|d| d.outcome == Outcome::Held).count()
    }

    /// GB of payload deleted by data-removing removals
    pub fn reclaimed_gb(&self) -> f64 {
        self.decisions
            .iter()
            .filter(|d| {
                matches!(
                    d.outcome,
                    Outcome::Applied {
                        action: Action::Remove { remove_data: true }
                    }
                )
            })
            .map(|d| d.size_gb)
            .sum()
    }

    /// Ids of items an action was applied to, in processing order
    pub fn acted_ids(&self) -> Vec<&ItemId> {
        self.decisions
            .iter()
            .filter(|d| matches!(d.outcome, Outcome::Applied { .. }))
            .map(|d| &d.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision(id: &str, size_gb: f64, outcome: Outcome) -> Decision {
        Decision {
            id: ItemId::new(id),
            name: id.to_string(),
            primary: 0.0,
            secondary: 0.0,
            size_gb,
            source: RuleSource::Global,
            qualifies: !matches!(outcome, Outcome::Kept),
            outcome,
        }
    }

    #[test]
    fn test_counters() {
        let mut report = PassReport::skipped(SkipReason::Unlimited);
        report.status = PassStatus::Completed;
        report.decisions = vec![
            decision("a", 3.0, Outcome::Applied { action: Action::Remove { remove_data: true } }),
            decision("b", 2.0, Outcome::Applied { action: Action::Remove { remove_data: false } }),
            decision("c", 1.0, Outcome::Applied { action: Action::Pause }),
            decision("d", 1.0, Outcome::Held),
            decision(
                "e",
                1.0,
                Outcome::Failed {
                    action: Action::Pause,
                    error: "boom".into(),
                },
            ),
            decision("f", 1.0, Outcome::Kept),
        ];

        assert!(!report.is_skipped());
        assert_eq!(report.removed(), 2);
        assert_eq!(report.paused(), 1);
        assert_eq!(report.held(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.reclaimed_gb(), 3.0);
        let ids: Vec<_> = report.acted_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_skip_reason_names() {
        assert_eq!(SkipReason::PassInFlight.as_str(), "pass_in_flight");
        assert!(PassReport::skipped(SkipReason::Unlimited).is_skipped());
    }
}
