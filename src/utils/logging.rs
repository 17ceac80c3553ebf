//! Diagnostic logging.
//!
//! The terminal belongs to the chat UI, so tracing output only goes to a
//! file, and only when one is configured. Verbosity comes from `PARLEY_LOG`
//! using the usual `EnvFilter` directive syntax.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "PARLEY_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber writing to `log_file`. Without a file this
/// is a no-op and tracing events are discarded.
pub fn init(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = open_log_file(path)?;
    let directive = std::env::var(LOG_FILTER_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(directive.as_deref()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| -> Box<dyn std::error::Error> { err })?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "parley starting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn filter_defaults_to_info() {
        assert_eq!(build_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            build_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn log_file_and_missing_parents_are_created() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("logs").join("parley.log");

        open_log_file(&path).expect("open log file");

        assert!(path.exists());
    }

    #[test]
    fn init_without_file_is_a_no_op() {
        init(None).expect("no-op init");
    }
}
