use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Result, ScraperError};

const LOG_FILE_PREFIX: &str = "imdb_scraper";
const LOG_FILE_SUFFIX: &str = "log";

/// Initializes console logging, plus a daily-rotated JSON log file when
/// `log_dir` is given. Keep the returned guard alive until exit so buffered
/// file output is flushed.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Respect RUST_LOG if set; otherwise info for our crate
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("imdb_scraper=info,warn"));

    // Console output goes to stderr so the table preview on stdout stays clean
    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(dir)?);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

/// Daily-rotated appender in `dir`, created if missing.
fn file_appender(dir: &Path) -> Result<RollingFileAppender> {
    fs::create_dir_all(dir).map_err(|e| {
        ScraperError::Config(format!(
            "Cannot create log directory '{}': {}",
            dir.display(),
            e
        ))
    })?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)
        .map_err(|e| {
            ScraperError::Config(format!(
                "Cannot open log file in '{}': {}",
                dir.display(),
                e
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appender_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");
        assert!(file_appender(&logs).is_ok());
        assert!(logs.is_dir());
    }

    #[test]
    fn unusable_log_dir_is_an_error_not_a_panic() {
        // A regular file where the directory should be
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = file_appender(&file.path().join("logs")).unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }
}
