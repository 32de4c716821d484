//! Autoremove Domain Layer
//!
//! This crate contains the value types and pure functions that the selection
//! engine is built from. It has no external dependencies and defines the
//! boundary trait through which the engine talks to the item host.
//!
//! ## Key Concepts
//!
//! - **Item**: A long-lived managed task (a seeded torrent) with accruing metrics
//! - **Metric**: A scalar derived from an item snapshot (ratio, age, seed time, ...)
//! - **Combinator**: AND / OR reducer used to merge rule results
//! - **Rule**: Combinator + metric + threshold, used for per-item overrides
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure logic only, no I/O
//! - The host registry is reached only through [`traits::ItemHost`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod item;
pub mod metric;
pub mod rule;
pub mod traits;

// Re-exports for convenience
pub use item::{Item, ItemId};
pub use metric::MetricKind;
pub use rule::{Combinator, Rule};
pub use traits::ItemHost;
