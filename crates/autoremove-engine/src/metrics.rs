//! Metrics collection across passes

use crate::report::{PassReport, PassStatus, SkipReason};
use std::collections::HashMap;

/// Cumulative counters over every pass run by one engine
///
/// Tracks completed and skipped passes, host actions, and reclaimed space.
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Passes that evaluated candidates
    pub passes_completed: usize,

    /// Skipped passes per reason
    pub skipped: HashMap<&'static str, usize>,

    /// Items removed
    pub removed: usize,

    /// Items paused
    pub paused: usize,

    /// Host actions that failed
    pub failed: usize,

    /// Qualifying items held back by the enabled / free-space gate
    pub held: usize,

    /// GB deleted by data-removing removals
    pub reclaimed_gb: f64,

    /// Actions decided during dry-run passes, never sent to the host
    pub simulated: usize,

    /// Total time spent in passes, in milliseconds
    pub total_runtime_ms: u64,
}

impl EngineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped pass
    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason.as_str()).or_insert(0) += 1;
    }

    /// Fold a finished pass into the counters
    ///
    /// Actions from a dry-run pass only count toward `simulated`.
    pub fn record_pass(&mut self, report: &PassReport) {
        if let PassStatus::Skipped(reason) = report.status {
            self.record_skip(reason);
            return;
        }

        self.passes_completed += 1;
        self.held += report.held();

        if report.dry_run {
            self.simulated += report.removed() + report.paused();
            return;
        }

        self.removed += report.removed();
        self.paused += report.paused();
        self.failed += report.failed();
        self.reclaimed_gb += report.reclaimed_gb();
    }

    /// Total skipped passes across reasons
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Autoremove Metrics Summary".to_string(),
            "==========================".to_string(),
            format!("Passes completed: {}", self.passes_completed),
            format!("Passes skipped: {}", self.total_skipped()),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
            format!("Removed: {}", self.removed),
            format!("Paused: {}", self.paused),
            format!("Held by gate: {}", self.held),
            format!("Failed: {}", self.failed),
            format!("Reclaimed: {:.2} GB", self.reclaimed_gb),
        ];

        if self.simulated > 0 {
            lines.push(format!("Dry-run actions: {}", self.simulated));
        }

        if !self.skipped.is_empty() {
            lines.push(String::new());
            lines.push("Skips by reason:".to_string());
            let mut reasons: Vec<_> = self.skipped.iter().collect();
            reasons.sort();
            for (reason, count) in reasons {
                lines.push(format!("  {}: {}", reason, count));
            }
        }

        lines.join("\n")
    }
}
