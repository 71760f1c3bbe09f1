//! Log output: console plus an optional daily-rotated file.

use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogSettings;

/// Errors raised while setting up logging.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory '{path}': {source}")]
    CreateDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("failed to install subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Build the rotating file writer for `dir`, creating the directory.
///
/// Files rotate at midnight (UTC) and only the newest `max_files` are kept.
pub fn file_appender(dir: &Path, settings: &LogSettings) -> Result<RollingFileAppender, LogError> {
    std::fs::create_dir_all(dir).map_err(|e| LogError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&settings.file_prefix)
        .filename_suffix("log")
        .max_log_files(settings.max_files)
        .build(dir)?)
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the process logs.
pub fn init(settings: &LogSettings) -> Result<Option<WorkerGuard>, LogError> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let console = tracing_subscriber::fmt::layer();

    let (file, guard) = match settings.dir.as_deref() {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(dir, settings)?);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;
    Ok(guard)
}
