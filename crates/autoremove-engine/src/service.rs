//! Control surface shared by the scheduler and external callers

use crate::config::{remove_rule_catalog, AutoRemoveConfig};
use crate::engine::SelectionEngine;
use crate::metrics::EngineMetrics;
use crate::report::{PassReport, SkipReason};
use crate::store::{Document, IgnoreState};
use crate::EngineError;
use autoremove_domain::{ItemHost, ItemId};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock, TryLockError};
use std::time::Duration;
use tokio::sync::watch;

fn lock_error(what: &str, e: impl Display) -> EngineError {
    EngineError::Worker(format!("{} lock error: {}", what, e))
}

/// Owns the host, the persisted documents, and the selection engine
///
/// Every method takes `&self`, so the service can be shared behind an `Arc`
/// between the scheduler and control callers. At most one pass runs at a
/// time; a pass requested while another is running is reported as
/// [`SkipReason::PassInFlight`].
pub struct AutoRemoveService<H> {
    host: Mutex<H>,
    engine: Mutex<SelectionEngine>,
    config: RwLock<AutoRemoveConfig>,
    state: Mutex<IgnoreState>,
    config_doc: Document<AutoRemoveConfig>,
    state_doc: Document<IgnoreState>,
    interval_tx: watch::Sender<Duration>,
    in_flight_skips: AtomicUsize,
}

impl<H> AutoRemoveService<H>
where
    H: ItemHost,
    H::Error: Display,
{
    /// Load both documents, filling and saving defaults on first use
    ///
    /// Stored values that fail validation are replaced by their defaults and
    /// the repaired configuration is written back.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(host: H, config_path: P, state_path: Q) -> Result<Self, EngineError> {
        let config_doc = Document::new(config_path);
        let state_doc = Document::new(state_path);

        let config: AutoRemoveConfig = config_doc.load_or_default()?;
        let config = config.repaired();
        config_doc.save(&config)?;

        let state: IgnoreState = state_doc.load_or_default()?;
        state_doc.save(&state)?;

        tracing::debug!(
            config = %config_doc.path().display(),
            state = %state_doc.path().display(),
            ignored = state.len(),
            "Loaded autoremove documents"
        );

        let (interval_tx, _) = watch::channel(config.check_interval());

        Ok(Self {
            host: Mutex::new(host),
            engine: Mutex::new(SelectionEngine::new()),
            config: RwLock::new(config),
            state: Mutex::new(state),
            config_doc,
            state_doc,
            interval_tx,
            in_flight_skips: AtomicUsize::new(0),
        })
    }

    /// Run one pass against the current configuration
    ///
    /// The configuration is cloned at the start, so updates made during the
    /// pass apply to the next one. The ignore state is saved when the pass
    /// changed it.
    pub fn run_pass(&self) -> Result<PassReport, EngineError> {
        let mut engine = match self.engine.try_lock() {
            Ok(engine) => engine,
            Err(TryLockError::WouldBlock) => {
                tracing::info!("Previous pass still running, skipping");
                self.in_flight_skips.fetch_add(1, Ordering::Relaxed);
                return Ok(PassReport::skipped(SkipReason::PassInFlight));
            }
            Err(TryLockError::Poisoned(e)) => return Err(lock_error("Engine", e)),
        };

        let config = self.get_config()?;
        let mut host = self.host.lock().map_err(|e| lock_error("Host", e))?;
        let mut state = self.state.lock().map_err(|e| lock_error("State", e))?;

        let report = engine.run_pass(&mut *host, &config, &mut state)?;
        if report.changed {
            self.state_doc.save(&state)?;
        }

        Ok(report)
    }

    /// Snapshot of the current configuration
    pub fn get_config(&self) -> Result<AutoRemoveConfig, EngineError> {
        let config = self.config.read().map_err(|e| lock_error("Config", e))?;
        Ok(config.clone())
    }

    /// Merge persisted keys into the configuration
    ///
    /// Unknown keys are ignored. The result is validated, saved, and the
    /// scheduler is signalled with the (possibly unchanged) interval.
    pub fn set_config(&self, patch: &Map<String, Value>) -> Result<AutoRemoveConfig, EngineError> {
        let mut config = self.config.write().map_err(|e| lock_error("Config", e))?;
        let merged = config.merged(patch)?;
        self.commit_config(&mut config, merged)
    }

    /// Replace the whole configuration
    pub fn replace_config(&self, replacement: AutoRemoveConfig) -> Result<AutoRemoveConfig, EngineError> {
        replacement.validate()?;
        let mut config = self.config.write().map_err(|e| lock_error("Config", e))?;
        self.commit_config(&mut config, replacement)
    }

    fn commit_config(
        &self,
        current: &mut AutoRemoveConfig,
        next: AutoRemoveConfig,
    ) -> Result<AutoRemoveConfig, EngineError> {
        self.config_doc.save(&next)?;
        *current = next;

        let interval = current.check_interval();
        self.interval_tx.send_replace(interval);
        tracing::info!(?interval, enabled = current.enabled, "Configuration updated");

        Ok(current.clone())
    }

    /// Map of metric name → display name
    pub fn remove_rule_catalog(&self) -> BTreeMap<&'static str, &'static str> {
        remove_rule_catalog()
    }

    /// Ignore flags for `ids`, in order
    pub fn get_ignore(&self, ids: &[ItemId]) -> Result<Vec<bool>, EngineError> {
        let state = self.state.lock().map_err(|e| lock_error("State", e))?;
        Ok(state.get_many(ids))
    }

    /// Set the ignore flag on every id and save the state
    ///
    /// Waits for a running pass to finish, so the pass's own save never
    /// overwrites these flags.
    pub fn set_ignore(&self, ids: &[ItemId], ignored: bool) -> Result<(), EngineError> {
        let mut state = self.state.lock().map_err(|e| lock_error("State", e))?;
        state.set_many(ids, ignored);
        self.state_doc.save(&state)?;
        tracing::debug!(count = ids.len(), ignored, "Ignore flags updated");
        Ok(())
    }

    /// Ids currently flagged as ignored
    pub fn ignored_ids(&self) -> Result<Vec<String>, EngineError> {
        let state = self.state.lock().map_err(|e| lock_error("State", e))?;
        Ok(state.ignored_ids().map(str::to_string).collect())
    }

    /// Receiver that observes the check interval after every config update
    pub fn subscribe_interval(&self) -> watch::Receiver<Duration> {
        self.interval_tx.subscribe()
    }

    /// Cumulative metrics, including passes dropped while another was running
    pub fn metrics(&self) -> Result<EngineMetrics, EngineError> {
        let engine = self.engine.lock().map_err(|e| lock_error("Engine", e))?;
        let mut metrics = engine.metrics().clone();
        for _ in 0..self.in_flight_skips.load(Ordering::Relaxed) {
            metrics.record_skip(SkipReason::PassInFlight);
        }
        Ok(metrics)
    }

    /// Run `f` with exclusive access to the host
    pub fn with_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> Result<R, EngineError> {
        let mut host = self.host.lock().map_err(|e| lock_error("Host", e))?;
        Ok(f(&mut *host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PassStatus;
    use crate::test_support::{gb, MockHost};
    use autoremove_domain::Item;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn host() -> MockHost {
        MockHost::new(vec![
            Item::new("a").with_ratio(0.5).with_size_bytes(gb(1)),
            Item::new("b").with_ratio(2.0).with_size_bytes(gb(1)),
            Item::new("c").with_ratio(3.0).with_size_bytes(gb(1)),
        ])
    }

    fn open(dir: &TempDir) -> AutoRemoveService<MockHost> {
        AutoRemoveService::open(host(), dir.path().join("autoremove.json"), dir.path().join("ignore.json")).unwrap()
    }

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("patch must be an object"),
        }
    }

    fn enable(service: &AutoRemoveService<MockHost>) {
        service
            .set_config(&patch(json!({
                "enabled": true,
                "max_seeds": 1,
                "filter": "func_ratio",
                "min": 1.0,
                "hdd_space": -1.0
            })))
            .unwrap();
    }

    #[test]
    fn test_open_saves_defaults() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);

        assert!(dir.path().join("autoremove.json").exists());
        assert!(dir.path().join("ignore.json").exists());
        assert_eq!(service.get_config().unwrap(), AutoRemoveConfig::default());
    }

    #[test]
    fn test_set_config_persists_and_signals() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);
        let mut rx = service.subscribe_interval();

        let config = service.set_config(&patch(json!({"interval": 0.5, "bogus": 1}))).unwrap();
        assert_eq!(config.check_interval_hours, 0.5);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Duration::from_secs(1800));

        let reopened = open(&dir);
        assert_eq!(reopened.get_config().unwrap().check_interval_hours, 0.5);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);

        let result = service.set_config(&patch(json!({"interval": 0.0})));
        assert!(matches!(result, Err(EngineError::Config(_))));
        assert_eq!(service.get_config().unwrap().check_interval_hours, 1.0);
    }

    #[test]
    fn test_open_repairs_invalid_stored_interval() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("autoremove.json");
        std::fs::write(&config_path, r#"{"interval": 0, "max_seeds": 4}"#).unwrap();

        let service = open(&dir);
        let config = service.get_config().unwrap();
        assert_eq!(config.check_interval_hours, 1.0);
        assert_eq!(config.max_allowed, 4);

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
        assert_eq!(saved["interval"], 1.0);
    }

    #[test]
    fn test_dry_run_passes_do_not_count_as_removals() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);
        enable(&service);
        service.set_config(&patch(json!({"dry_run": true}))).unwrap();

        service.run_pass().unwrap();
        service.run_pass().unwrap();

        let metrics = service.metrics().unwrap();
        assert_eq!(service.with_host(|h| h.removed_ids().len()).unwrap(), 0);
        assert_eq!(metrics.passes_completed, 2);
        assert_eq!(metrics.removed, 0);
        assert_eq!(metrics.reclaimed_gb, 0.0);
        assert_eq!(metrics.simulated, 4);
    }

    #[test]
    fn test_replace_with_current_is_noop() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);
        enable(&service);

        let before = service.get_config().unwrap();
        service.replace_config(service.get_config().unwrap()).unwrap();
        assert_eq!(service.get_config().unwrap(), before);
    }

    #[test]
    fn test_pass_saves_state_after_removal() {
        let dir = TempDir::new().unwrap();
        let service = open(&dir);
        enable(&service);
        service.set_ignore(&[ItemId::new("c")], false).unwrap();
        service.set_ignore(&[ItemId::new("a")], true).unwrap();

        let report = service.run_pass().unwrap();
        assert_eq!(report.status, PassStatus::Completed);
        assert!(report.changed);
        assert_eq!(service.with_host(|h| h.removed_ids().len()).unwrap(), 1);

        let reopened = open(&dir);
        assert_eq!(
            reopened.get_ignore(&[ItemId::new("a"), ItemId::new("c")]).unwrap(),
            vec![true, false]
        );
        assert_eq!(reopened.ignored_ids().unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn test_concurrent_pass_is_skipped() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(open(&dir));

        let _guard = service.engine.lock().unwrap();
        let report = service.run_pass().unwrap();
        assert_eq!(report.status, PassStatus::Skipped(SkipReason::PassInFlight));
        drop(_guard);

        assert_eq!(service.metrics().unwrap().skipped["pass_in_flight"], 1);
    }

    #[test]
    fn test_catalog() {
        let dir = TempDir::new().unwrap();
        let catalog = open(&dir).remove_rule_catalog();
        assert_eq!(catalog["func_ratio"], "Ratio");
        assert_eq!(catalog.len(), 5);
    }
}
