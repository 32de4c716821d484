//! Autoremove Engine
//!
//! Periodic selection engine that keeps a host's item registry within a
//! configured size by removing (or pausing) the least valuable items.
//!
//! # Overview
//!
//! The engine is responsible for:
//! - **Exemption**: Items that are ignored, or match an exempt tracker or label, are never acted on
//! - **Ranking**: Finished items are sorted by a primary and secondary metric
//! - **Selection**: Items ranked past `max_seeds` are tested against global or per-tracker/label rules
//! - **Space gating**: Actions stop once the free-space target is met
//! - **Persistence**: Configuration and ignore flags are kept as whole documents
//! - **Scheduling**: A background worker runs a pass on every interval tick
//!
//! # Pass Order
//!
//! | Step | Stops the pass when |
//! |------|---------------------|
//! | **Unlimited** | `max_seeds < 0` |
//! | **Below limit** | total items `<= max_seeds` |
//! | **Below limit after exemptions** | active (+ exempt when counted) `<= max_seeds` |
//! | **Candidates** | never; each candidate past the cap is evaluated, worst first |
//!
//! # Usage
//!
//! ## One-time Pass
//!
//! ```no_run
//! use autoremove_engine::AutoRemoveService;
//! # use autoremove_domain::ItemHost;
//!
//! # fn run<H: ItemHost>(host: H) -> Result<(), Box<dyn std::error::Error>>
//! # where H::Error: std::fmt::Display {
//! let service = AutoRemoveService::open(host, "autoremove.json", "ignore.json")?;
//!
//! let report = service.run_pass()?;
//! println!("removed {}, paused {}", report.removed(), report.paused());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use autoremove_engine::{AutoRemoveService, AutoRemoveWorker};
//! use std::sync::Arc;
//! # use autoremove_domain::ItemHost;
//!
//! # async fn run<H>(host: H) -> Result<(), Box<dyn std::error::Error>>
//! # where H: ItemHost + Send + 'static, H::Error: std::fmt::Display {
//! let service = Arc::new(AutoRemoveService::open(host, "autoremove.json", "ignore.json")?);
//! AutoRemoveWorker::new(service).run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Documents ending in `.toml` are stored as TOML, anything else as JSON:
//!
//! ```toml
//! max_seeds = 50
//! filter = "func_seed_time"
//! filter2 = "func_ratio"
//! sel_func = "and"
//! min = 168.0
//! min2 = 0.0
//! interval = 1.0
//! hdd_space = 10.0
//! remove = true
//! remove_data = true
//! enabled = true
//! rule_1_enabled = true
//! rule_2_enabled = false
//! count_exempt = false
//! dry_run = false
//! trackers = ["private.example"]
//! labels = ["keep"]
//!
//! [tracker_rules]
//! "public.example" = [["and", "func_ratio", 2.0]]
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod exemption;
mod metrics;
mod report;
mod resolver;
mod service;
mod store;
mod worker;

#[cfg(test)]
mod test_support;

pub use config::{remove_rule_catalog, AutoRemoveConfig, Policy, RuleSpec};
pub use engine::{removal_condition, sort_by_metrics, SelectionEngine};
pub use error::{ConfigError, EngineError, StoreError};
pub use exemption::{exemption_reason, partition, ExemptReason, Partition};
pub use metrics::EngineMetrics;
pub use report::{Action, Decision, Outcome, PassReport, PassStatus, RuleSource, SkipReason};
pub use resolver::resolve;
pub use service::AutoRemoveService;
pub use store::{Document, DocumentFormat, IgnoreState};
pub use worker::AutoRemoveWorker;
