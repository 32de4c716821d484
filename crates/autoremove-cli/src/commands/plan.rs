//! Plan command implementation.

use crate::error::Result;
use crate::output::Formatter;
use crate::paths::Paths;
use crate::snapshot::SnapshotHost;
use autoremove_engine::{AutoRemoveConfig, Document, IgnoreState, SelectionEngine};

/// Run a dry pass against the current documents.
///
/// Nothing is written: missing documents are treated as defaults.
pub fn execute_plan(paths: &Paths, formatter: &Formatter) -> Result<String> {
    let config: AutoRemoveConfig = Document::new(&paths.config).load_or_default()?;
    let mut config = config.repaired();
    config.dry_run = true;

    let mut state: IgnoreState = Document::new(&paths.state).load_or_default()?;
    let mut host = SnapshotHost::open(&paths.snapshot)?;

    let report = SelectionEngine::new().run_pass(&mut host, &config, &mut state)?;
    formatter.format_report(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::test_util;

    #[test]
    fn test_plan_leaves_documents_untouched() {
        let (_dir, paths) = test_util::workspace();
        let before = std::fs::read_to_string(&paths.snapshot).unwrap();

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = execute_plan(&paths, &formatter).unwrap();

        assert!(output.contains("would remove with data"));
        assert!(output.contains("Dry run: 1 removed"));
        assert_eq!(std::fs::read_to_string(&paths.snapshot).unwrap(), before);
        assert!(!paths.state.exists());
    }
}
