//! Run command implementation.

use super::Service;
use crate::error::Result;
use crate::output::Formatter;

/// Execute one pass and format its report.
pub fn execute_run(service: &Service, formatter: &Formatter) -> Result<String> {
    let report = service.run_pass()?;
    formatter.format_report(&report)
}
