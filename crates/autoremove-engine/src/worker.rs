//! Background worker for scheduled passes

use crate::report::PassReport;
use crate::service::AutoRemoveService;
use crate::EngineError;
use autoremove_domain::ItemHost;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio::time::{interval, sleep, Duration};

/// Background worker that runs passes on the configured interval
///
/// The first pass runs after a short start delay. Whenever the configuration
/// is updated through the service, the schedule restarts with the new
/// interval and a pass runs immediately. A failing pass is logged and the
/// schedule continues.
///
/// # Examples
///
/// ```no_run
/// use autoremove_engine::{AutoRemoveService, AutoRemoveWorker};
/// use std::sync::Arc;
/// # use autoremove_domain::ItemHost;
///
/// # async fn run<H>(host: H) -> Result<(), Box<dyn std::error::Error>>
/// # where H: ItemHost + Send + 'static, H::Error: std::fmt::Display {
/// let service = Arc::new(AutoRemoveService::open(host, "autoremove.json", "ignore.json")?);
/// let worker = AutoRemoveWorker::new(service);
///
/// // Run until Ctrl+C
/// worker.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct AutoRemoveWorker<H> {
    service: Arc<AutoRemoveService<H>>,
    start_delay: Duration,
}

impl<H> AutoRemoveWorker<H>
where
    H: ItemHost + Send + 'static,
    H::Error: Display,
{
    /// Delay before the first scheduled pass
    pub const DEFAULT_START_DELAY: Duration = Duration::from_secs(5);

    /// Create a worker for the given service
    pub fn new(service: Arc<AutoRemoveService<H>>) -> Self {
        Self {
            service,
            start_delay: Self::DEFAULT_START_DELAY,
        }
    }

    /// Override the delay before the first pass
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// The service this worker drives
    pub fn service(&self) -> &Arc<AutoRemoveService<H>> {
        &self.service
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    pub async fn run(&self) -> Result<(), EngineError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Cannot listen for shutdown signal: {}", e);
            }
        })
        .await
    }

    /// Run the worker until `shutdown` completes
    ///
    /// A pass already running when `shutdown` completes is finished first.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), EngineError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut interval_rx = self.service.subscribe_interval();

        tokio::select! {
            _ = sleep(self.start_delay) => {}
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received before first pass");
                return Ok(());
            }
        }

        let period = *interval_rx.borrow_and_update();
        let mut ticker = interval(period);
        tracing::info!("Autoremove worker started (interval: {:?})", period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting scheduled pass");
                    match self.spawn_pass().await {
                        Ok(report) => log_report(&report),
                        Err(e) => tracing::error!("Pass failed: {}", e),
                    }
                }
                changed = interval_rx.changed() => {
                    if changed.is_err() {
                        tracing::warn!("Configuration channel closed, stopping worker");
                        break;
                    }
                    let period = *interval_rx.borrow_and_update();
                    tracing::info!("Restarting schedule (interval: {:?})", period);
                    ticker = interval(period);
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping autoremove worker");
                    break;
                }
            }
        }

        let metrics = self.service.metrics()?;
        tracing::info!("Autoremove worker stopped. Final metrics:\n{}", metrics.summary());

        Ok(())
    }

    /// Run a fixed number of passes on the current interval
    ///
    /// The first pass runs immediately. Stops at the first failing pass.
    pub async fn run_cycles(&self, cycles: usize) -> Result<Vec<PassReport>, EngineError> {
        let period = *self.service.subscribe_interval().borrow();
        let mut ticker = interval(period);
        let mut reports = Vec::with_capacity(cycles);

        tracing::info!("Autoremove worker started for {} cycles (interval: {:?})", cycles, period);

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting pass {}/{}", cycle + 1, cycles);

            match self.spawn_pass().await {
                Ok(report) => {
                    log_report(&report);
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!("Pass {}/{} failed: {}", cycle + 1, cycles, e);
                    return Err(e);
                }
            }
        }

        Ok(reports)
    }

    async fn spawn_pass(&self) -> Result<PassReport, EngineError> {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || service.run_pass())
            .await
            .map_err(|e| EngineError::Worker(format!("pass task panicked: {}", e)))?
    }
}

fn log_report(report: &PassReport) {
    if report.is_skipped() {
        tracing::debug!(status = ?report.status, "Pass skipped");
    } else {
        tracing::info!(
            "Pass completed: {} removed, {} paused, {} held, {} failed",
            report.removed(),
            report.paused(),
            report.held(),
            report.failed()
        );
    }
}
