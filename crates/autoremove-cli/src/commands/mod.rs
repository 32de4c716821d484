//! Command implementations.
//!
//! Every command returns the text to print, so `main` owns stdout.

pub mod config;
pub mod ignore;
pub mod plan;
pub mod rules;
pub mod run;
pub mod watch;

pub use self::config::execute_config;
pub use self::ignore::{execute_ignore, execute_ignored};
pub use self::plan::execute_plan;
pub use self::rules::execute_rules;
pub use self::run::execute_run;
pub use self::watch::execute_watch;

use crate::error::Result;
use crate::paths::Paths;
use crate::snapshot::SnapshotHost;
use autoremove_engine::AutoRemoveService;

/// Service over a snapshot file.
pub type Service = AutoRemoveService<SnapshotHost>;

/// Open the service for the resolved paths, creating default documents.
pub fn open_service(paths: &Paths) -> Result<Service> {
    let host = SnapshotHost::open(&paths.snapshot)?;
    Ok(AutoRemoveService::open(host, &paths.config, &paths.state)?)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    pub const SNAPSHOT: &str = r#"{
        "free_space_gb": 5.0,
        "items": [
            {"id": "low", "ratio": 0.5, "size_bytes": 1073741824},
            {"id": "mid", "ratio": 1.5, "size_bytes": 1073741824},
            {"id": "high", "ratio": 3.0, "size_bytes": 3221225472}
        ]
    }"#;

    pub const CONFIG: &str = r#"{
        "enabled": true,
        "max_seeds": 1,
        "filter": "func_ratio",
        "min": 1.0,
        "hdd_space": 6.0
    }"#;

    /// Data directory with a snapshot and an enabled configuration.
    pub fn workspace() -> (TempDir, Paths) {
        let dir = TempDir::new().unwrap();
        let paths = Paths::in_dir(dir.path(), "autoremove.json", None);
        write(&paths.snapshot, SNAPSHOT);
        write(&paths.config, CONFIG);
        (dir, paths)
    }

    fn write(path: &Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }
}
