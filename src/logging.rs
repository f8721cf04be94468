//! Subscriber setup for processes that embed the recommender.
//!
//! The library only emits `tracing` events and never installs a subscriber
//! itself. Hosts that have no subscriber of their own call [`init_tracing`]
//! once at startup and hold the returned guard until shutdown.

use std::path::PathBuf;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_FILE_PREFIX: &str = "recommender.log";

/// Where and how verbosely recommender events are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `practice_recommender=debug`.
    pub level: String,
    /// Directory for daily rolling files; `None` writes to stdout only.
    pub file_dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            file_dir: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl LoggingConfig {
    /// Reads `RECOMMENDER_LOG_LEVEL`, `ENABLE_FILE_LOGS` and `LOG_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("RECOMMENDER_LOG_LEVEL") {
            if !level.trim().is_empty() {
                config.level = level.trim().to_string();
            }
        }
        let file_logs = std::env::var("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        if file_logs {
            let dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
            config.file_dir = Some(PathBuf::from(dir));
        }
        config
    }

    /// Parsed filter; an invalid directive falls back to `info`.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }

    fn file_writer(&self) -> std::io::Result<Option<(NonBlocking, WorkerGuard)>> {
        let Some(dir) = &self.file_dir else {
            return Ok(None);
        };
        std::fs::create_dir_all(dir)?;
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, &self.file_prefix);
        Ok(Some(tracing_appender::non_blocking(appender)))
    }
}

/// Keeps the background file writer alive. Dropping it flushes pending lines.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs a stdout subscriber, plus a rolling file layer when
/// `config.file_dir` is set.
///
/// Returns `None` when no file layer was installed, including when the host
/// already set a global subscriber.
pub fn init_tracing(config: &LoggingConfig) -> Option<FileLogGuard> {
    let stdout_layer = fmt::layer().with_target(true);

    let file = match config.file_writer() {
        Ok(file) => file,
        Err(err) => {
            eprintln!("file logging disabled, cannot prepare {:?}: {err}", config.file_dir);
            None
        }
    };

    match file {
        Some((writer, guard)) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            let installed = tracing_subscriber::registry()
                .with(config.filter())
                .with(stdout_layer)
                .with(file_layer)
                .try_init()
                .is_ok();
            installed.then_some(FileLogGuard { _guard: guard })
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(config.filter())
                .with(stdout_layer)
                .try_init();
            None
        }
    }
}
