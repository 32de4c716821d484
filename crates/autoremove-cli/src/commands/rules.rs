//! Rules command implementation.

use super::Service;
use crate::error::Result;
use crate::output::Formatter;

/// List the metrics available to filters and rules.
pub fn execute_rules(service: &Service, formatter: &Formatter) -> Result<String> {
    formatter.format_catalog(&service.remove_rule_catalog())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::{open_service, test_util};

    #[test]
    fn test_rules_quiet() {
        let (_dir, paths) = test_util::workspace();
        let service = open_service(&paths).unwrap();
        let output = execute_rules(&service, &Formatter::new(OutputFormat::Quiet, false)).unwrap();

        let names: Vec<_> = output.lines().collect();
        assert_eq!(names.len(), 5);
        assert!(names.contains(&"func_seed_time"));
    }
}
