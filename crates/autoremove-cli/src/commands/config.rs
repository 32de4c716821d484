//! Config command implementation.

use super::Service;
use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use autoremove_engine::AutoRemoveConfig;
use serde_json::{Map, Value};

/// Execute a config action.
pub fn execute_config(args: ConfigArgs, service: &Service, formatter: &Formatter) -> Result<String> {
    let config = match args.action {
        ConfigAction::Show => service.get_config()?,
        ConfigAction::Set { assignments } => service.set_config(&parse_assignments(&assignments)?)?,
        ConfigAction::Reset => service.replace_config(AutoRemoveConfig::default())?,
    };
    formatter.format_config(&config)
}

/// Parse `key=value` pairs into a patch.
///
/// Values are read as JSON when they parse, otherwise as plain strings, so
/// `filter=func_ratio` and `trackers=["a","b"]` both work. Keys must name a
/// configuration field.
pub fn parse_assignments(assignments: &[String]) -> Result<Map<String, Value>> {
    let known = match serde_json::to_value(AutoRemoveConfig::default())? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };

    let mut patch = Map::new();
    for assignment in assignments {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| CliError::InvalidInput(format!("Expected key=value, got '{}'", assignment)))?;
        let key = key.trim();

        if !known.contains_key(key) {
            return Err(CliError::InvalidInput(format!("Unknown configuration key '{}'", key)));
        }

        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        patch.insert(key.to_string(), value);
    }

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::commands::{open_service, test_util};
    use serde_json::json;

    #[test]
    fn test_parse_assignments() {
        let patch = parse_assignments(&[
            "max_seeds=10".to_string(),
            "filter=func_ratio".to_string(),
            "trackers=[\"private\"]".to_string(),
            "enabled=true".to_string(),
        ])
        .unwrap();

        assert_eq!(patch["max_seeds"], json!(10));
        assert_eq!(patch["filter"], json!("func_ratio"));
        assert_eq!(patch["trackers"], json!(["private"]));
        assert_eq!(patch["enabled"], json!(true));
    }

    #[test]
    fn test_rejects_bad_assignments() {
        assert!(matches!(
            parse_assignments(&["max_seeds".to_string()]),
            Err(CliError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_assignments(&["bogus=1".to_string()]),
            Err(CliError::InvalidInput(msg)) if msg.contains("bogus")
        ));
    }

    #[test]
    fn test_set_show_reset() {
        let (_dir, paths) = test_util::workspace();
        let formatter = Formatter::new(OutputFormat::Json, false);

        let service = open_service(&paths).unwrap();
        let args = ConfigArgs {
            action: ConfigAction::Set {
                assignments: vec!["max_seeds=25".to_string()],
            },
        };
        execute_config(args, &service, &formatter).unwrap();

        let reopened = open_service(&paths).unwrap();
        let shown = execute_config(ConfigArgs { action: ConfigAction::Show }, &reopened, &formatter).unwrap();
        let value: Value = serde_json::from_str(&shown).unwrap();
        assert_eq!(value["max_seeds"], json!(25));
        assert_eq!(value["filter"], json!("func_ratio"));

        execute_config(ConfigArgs { action: ConfigAction::Reset }, &reopened, &formatter).unwrap();
        assert_eq!(reopened.get_config().unwrap(), AutoRemoveConfig::default());
    }

    #[test]
    fn test_reset_over_hand_edited_interval() {
        let (_dir, paths) = test_util::workspace();
        std::fs::write(&paths.config, r#"{"interval": 0, "max_seeds": 3}"#).unwrap();
        let formatter = Formatter::new(OutputFormat::Json, false);

        let service = open_service(&paths).unwrap();
        assert_eq!(service.get_config().unwrap().check_interval_hours, 1.0);

        execute_config(ConfigArgs { action: ConfigAction::Reset }, &service, &formatter).unwrap();
        let reopened = open_service(&paths).unwrap();
        assert_eq!(reopened.get_config().unwrap(), AutoRemoveConfig::default());
    }
}
