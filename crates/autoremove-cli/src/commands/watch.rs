//! Watch command implementation.

use super::Service;
use crate::cli::WatchArgs;
use crate::error::Result;
use crate::output::Formatter;
use autoremove_engine::AutoRemoveWorker;
use std::sync::Arc;
use std::time::Duration;

/// Run the scheduler, either for a number of passes or until Ctrl+C.
pub async fn execute_watch(args: WatchArgs, service: Service, formatter: &Formatter) -> Result<String> {
    let worker = AutoRemoveWorker::new(Arc::new(service)).with_start_delay(Duration::from_secs(args.start_delay));

    match args.cycles {
        Some(cycles) => {
            let reports = worker.run_cycles(cycles).await?;
            let outputs = reports
                .iter()
                .map(|report| formatter.format_report(report))
                .collect::<Result<Vec<_>>>()?;
            Ok(outputs.join("\n"))
        }
        None => {
            worker.run().await?;
            Ok(worker.service().metrics()?.summary())
        }
    }
}
