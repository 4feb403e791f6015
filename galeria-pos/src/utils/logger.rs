//! 日志初始化
//!
//! `tracing-subscriber` fmt output filtered by `RUST_LOG` (falling back to
//! `LOG_LEVEL`). With a log dir the output goes to a daily rolling file
//! through a non-blocking writer instead.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "galeria-pos";

/// Flushes the file writer on drop; hold it until the process exits
#[must_use]
#[derive(Debug)]
pub struct LogGuard(Option<WorkerGuard>);

impl LogGuard {
    pub fn writes_to_file(&self) -> bool {
        self.0.is_some()
    }
}

/// Stdout only, level `info` unless `RUST_LOG` is set
pub fn init_logger() -> LogGuard {
    init_logger_with_file(None, None)
}

/// A second call (e.g. from tests) keeps the first subscriber
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) -> LogGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let Some(dir) = log_dir else {
        let _ = builder.try_init();
        return LogGuard(None);
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        let _ = builder.try_init();
        tracing::warn!(dir, error = %e, "Log directory unavailable, logging to stdout");
        return LogGuard(None);
    }

    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = builder.with_ansi(false).with_writer(writer).try_init();
    LogGuard(Some(guard))
}
