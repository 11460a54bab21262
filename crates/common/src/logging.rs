//! Logging and tracing initialization.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// When [`LoggingConfig::file`] is set, output goes to that file (appending,
/// without ANSI escapes); otherwise it goes to the console. If the file
/// cannot be opened, the console is used and a note says so.
pub fn init_logging(config: &LoggingConfig) {
    tracing::subscriber::set_global_default(build_subscriber(config)).ok();
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

fn build_subscriber(config: &LoggingConfig) -> Box<dyn tracing::Subscriber + Send + Sync> {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match (config.file.as_deref().and_then(open_log_file), config.json) {
        (Some(writer), true) => Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .json()
                .finish(),
        ),
        (Some(writer), false) => Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .finish(),
        ),
        (None, true) => Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .json()
                .finish(),
        ),
        (None, false) => Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        ),
    }
}

fn open_log_file(path: &Path) -> Option<Arc<File>> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(Arc::new(file)),
        Err(e) => {
            eprintln!(
                "Cannot open log file {}: {e}; logging to the console instead",
                path.display()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_receives_log_lines() {
        let path = std::env::temp_dir().join(format!(
            "velotrace-logging-test-{}.log",
            std::process::id()
        ));
        let config = LoggingConfig {
            level: "info".to_string(),
            json: false,
            file: Some(path.clone()),
        };

        tracing::subscriber::with_default(build_subscriber(&config), || {
            tracing::info!("file sink check");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(contents.contains("file sink check"), "log file: {contents:?}");
    }

    #[test]
    fn test_unopenable_file_falls_back_to_console() {
        let config = LoggingConfig {
            level: "info".to_string(),
            json: false,
            file: Some(std::path::PathBuf::from("/nonexistent-dir/velotrace.log")),
        };

        // Must not panic, and must still produce a usable subscriber.
        tracing::subscriber::with_default(build_subscriber(&config), || {
            tracing::info!("console fallback check");
        });
    }
}
