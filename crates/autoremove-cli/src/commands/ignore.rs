//! Ignore, unignore, and ignored command implementations.

use super::Service;
use crate::error::Result;
use crate::output::Formatter;
use autoremove_domain::ItemId;

/// Set the ignore flag on the given ids.
pub fn execute_ignore(ids: &[String], ignored: bool, service: &Service, formatter: &Formatter) -> Result<String> {
    let ids: Vec<ItemId> = ids.iter().map(|id| ItemId::new(id.as_str())).collect();
    service.set_ignore(&ids, ignored)?;
    Ok(formatter.ignore_result(ignored, ids.len()))
}

/// List ids flagged as ignored.
pub fn execute_ignored(service: &Service, formatter: &Formatter) -> Result<String> {
    formatter.format_ids(&service.ignored_ids()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::{open_service, test_util};

    #[test]
    fn test_ignore_round_trip() {
        let (_dir, paths) = test_util::workspace();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let service = open_service(&paths).unwrap();

        execute_ignore(&["high".to_string(), "mid".to_string()], true, &service, &formatter).unwrap();
        execute_ignore(&["mid".to_string()], false, &service, &formatter).unwrap();

        let reopened = open_service(&paths).unwrap();
        assert_eq!(execute_ignored(&reopened, &formatter).unwrap(), "high");
    }

    #[test]
    fn test_ignored_item_survives_run() {
        let (_dir, paths) = test_util::workspace();
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let service = open_service(&paths).unwrap();

        execute_ignore(&["high".to_string()], true, &service, &formatter).unwrap();
        let report = service.run_pass().unwrap();

        assert!(report.acted_ids().iter().all(|id| id.as_str() != "high"));
        assert_eq!(report.exempt_items, 1);
    }
}
