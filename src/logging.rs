use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::storage::ensure_dir;

const LOG_ENV: &str = "MONTHCAL_LOG";

/// Sends `tracing` output to `path`, since the terminal belongs to the UI.
/// Filter comes from `MONTHCAL_LOG` (default `info`). Returns false when the log
/// file can't be opened; the app then runs without logs.
pub fn init(path: &Path) -> bool {
    if let Some(parent) = path.parent()
        && ensure_dir(parent).is_err()
    {
        return false;
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}
