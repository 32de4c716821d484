//! Output formatting for the CLI.

use crate::cli::OutputFormat;
use crate::error::Result;
use autoremove_engine::{Action, AutoRemoveConfig, Outcome, PassReport, PassStatus, RuleSource, SkipReason};
use colored::*;
use serde_json::Value;
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self { format, color_enabled }
    }

    /// Format a pass report.
    pub fn format_report(&self, report: &PassReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Quiet => Ok(report
                .acted_ids()
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_report_table(&self, report: &PassReport) -> String {
        let reason = match report.status {
            PassStatus::Skipped(reason) => reason,
            PassStatus::Completed => return self.format_decisions(report),
        };

        let message = match reason {
            SkipReason::Unlimited => "No actions: max_seeds is negative".to_string(),
            SkipReason::BelowLimit { total, max_allowed } => {
                format!("No actions: {} item(s), max_seeds is {}", total, max_allowed)
            }
            SkipReason::BelowLimitAfterExemptions { counted, max_allowed } => {
                format!("No actions: {} counted item(s), max_seeds is {}", counted, max_allowed)
            }
            SkipReason::PassInFlight => "No actions: another pass is running".to_string(),
        };
        self.info(&message)
    }

    fn format_decisions(&self, report: &PassReport) -> String {
        let mut lines = vec![format!(
            "{} item(s), {} active, {} exempt, keeping the best {}",
            report.total_items, report.active_items, report.exempt_items, report.effective_max
        )];

        if let (Some(before), Some(after)) = (report.needed_space_before, report.needed_space_after) {
            lines.push(format!("Space needed: {:.2} GB before, {:.2} GB after", before, after));
        }

        if report.decisions.is_empty() {
            lines.push(self.colorize("No candidates.", "yellow"));
            return lines.join("\n");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Primary", "Secondary", "Size (GB)", "Rules", "Outcome"]);

        for decision in &report.decisions {
            let rules = match decision.source {
                RuleSource::Specific(count) => format!("specific ({})", count),
                RuleSource::Global => "global".to_string(),
            };
            builder.push_record([
                decision.id.to_string(),
                decision.name.clone(),
                format!("{:.2}", decision.primary),
                format!("{:.2}", decision.secondary),
                format!("{:.2}", decision.size_gb),
                rules,
                outcome_label(&decision.outcome, report.dry_run),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        lines.push(table.to_string());

        let summary = format!(
            "{} removed, {} paused, {} held, {} failed",
            report.removed(),
            report.paused(),
            report.held(),
            report.failed()
        );
        lines.push(if report.dry_run {
            self.warning(&format!("Dry run: {}", summary))
        } else {
            self.success(&summary)
        });

        lines.join("\n")
    }

    /// Format the configuration.
    pub fn format_config(&self, config: &AutoRemoveConfig) -> Result<String> {
        let value = serde_json::to_value(config)?;
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&value)?),
            OutputFormat::Quiet => Ok(serde_json::to_string(&value)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Key", "Value"]);
                if let Value::Object(fields) = value {
                    for (key, value) in fields {
                        builder.push_record([key, value.to_string()]);
                    }
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format the metric catalog.
    pub fn format_catalog(&self, catalog: &BTreeMap<&'static str, &'static str>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(catalog)?),
            OutputFormat::Quiet => Ok(catalog.keys().copied().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Name"]);
                for (key, name) in catalog {
                    builder.push_record([*key, *name]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format a list of item ids.
    pub fn format_ids(&self, ids: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(ids)?),
            OutputFormat::Quiet => Ok(ids.join("\n")),
            OutputFormat::Table if ids.is_empty() => Ok(self.colorize("No ignored items.", "yellow")),
            OutputFormat::Table => Ok(ids.join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format the result of an ignore / unignore.
    pub fn ignore_result(&self, ignored: bool, count: usize) -> String {
        let verb = if ignored { "Ignored" } else { "Unignored" };
        self.success(&format!("{} {} item(s)", verb, count))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Human readable outcome of a decision.
pub fn outcome_label(outcome: &Outcome, dry_run: bool) -> String {
    let action_label = |action: &Action| match action {
        Action::Pause => "pause",
        Action::Remove { remove_data: true } => "remove with data",
        Action::Remove { remove_data: false } => "remove",
    };

    match outcome {
        Outcome::Kept => "keep".to_string(),
        Outcome::Held => "held (gate closed)".to_string(),
        Outcome::Applied { action } if dry_run => format!("would {}", action_label(action)),
        Outcome::Applied { action } => action_label(action).to_string(),
        Outcome::Failed { action, error } => format!("{} failed: {}", action_label(action), error),
    }
}
