use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::schema::LoggingConfig;

/// Rolling log files are named `moodify.log.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "moodify.log";

/// Days of rolled logs kept on disk.
const LOG_RETENTION_DAYS: u64 = 7;

/// Initialize the logging system.
///
/// Keep the returned guard alive for the lifetime of the process, dropping it
/// flushes and stops the background file writer.
pub fn init_logging(config: &LoggingConfig) -> WorkerGuard {
    let filter = build_filter(config);

    let format_str = std::env::var("LOG_FORMAT").unwrap_or_else(|_| config.format.clone());
    let is_json = format_str.eq_ignore_ascii_case("json");

    let file_appender = tracing_appender::rolling::daily(&config.dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = if is_json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layer = if is_json {
        fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    Registry::default()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Err(e) = cleanup_old_logs(&config.dir, LOG_RETENTION_DAYS) {
        eprintln!("Failed to clean up old logs: {}", e);
    }

    guard
}

/// RUST_LOG wins over the configured level; module overrides apply on top.
fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level_str));

    for (module, level) in &config.overrides {
        match format!("{}={}", module, level).parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(_) => eprintln!("Invalid log directive: {}={}", module, level),
        }
    }

    filter
}

/// Clean up log files older than `days` days
fn cleanup_old_logs(dir: &str, days: u64) -> std::io::Result<usize> {
    let path = Path::new(dir);
    if !path.exists() {
        return Ok(0);
    }

    let now = SystemTime::now();
    let threshold = Duration::from_secs(days * 24 * 3600);
    let mut removed = 0;

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX));
        if !is_log {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());

        if matches!(age, Some(age) if age > threshold) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => eprintln!("Failed to remove old log file {:?}: {}", path, e),
            }
        }
    }

    Ok(removed)
}
