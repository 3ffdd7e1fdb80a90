//! Logging configuration and subscriber setup

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    /// Log to stderr
    pub console_output: bool,
    /// Log to a file in `log_directory`
    pub file_output: bool,
    /// Directory for log files
    pub log_directory: PathBuf,
    /// Log file name prefix; files are named `<prefix>_<date>.log`
    pub file_prefix: String,
    /// Number of log files kept when cleaning up
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from("logs"),
            file_prefix: "fixture".to_string(),
            max_log_files: 10,
        }
    }
}

impl LogConfig {
    /// Parse `level`, falling back to INFO for unknown values.
    pub fn parse_level(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    /// Create the log directory when file output is enabled.
    pub fn ensure_log_directory(&self) -> std::io::Result<()> {
        if self.file_output {
            std::fs::create_dir_all(&self.log_directory)?;
        }
        Ok(())
    }

    /// Path of today's log file
    pub fn current_log_path(&self) -> PathBuf {
        let date = chrono::Local::now().format("%Y-%m-%d");
        self.log_directory
            .join(format!("{}_{}.log", self.file_prefix, date))
    }

    /// Remove the oldest log files so at most `max_log_files` remain.
    pub fn cleanup_old_logs(&self) -> std::io::Result<usize> {
        if !self.log_directory.is_dir() {
            return Ok(0);
        }

        let mut logs: Vec<PathBuf> = std::fs::read_dir(&self.log_directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| self.is_own_log(path))
            .collect();

        if logs.len() <= self.max_log_files {
            return Ok(0);
        }

        // Date-stamped names sort chronologically
        logs.sort();
        let excess = logs.len() - self.max_log_files;
        for path in &logs[..excess] {
            std::fs::remove_file(path)?;
        }
        Ok(excess)
    }

    fn is_own_log(&self, path: &Path) -> bool {
        let is_log = path.extension().is_some_and(|ext| ext == "log");
        let has_prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(&format!("{}_", self.file_prefix)));
        is_log && has_prefix
    }
}

/// Handle to keep the logging worker thread alive
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Console lines carry the thread
/// name, so packets handled on the `sacn-receiver` worker are easy to tell apart from
/// control calls. Returns a guard when file output is enabled; dropping it flushes and
/// stops the file writer.
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    config
        .ensure_log_directory()
        .context("Failed to create log directory")?;

    // Reported once the subscriber is up
    let cleanup = if config.file_output {
        Some(config.cleanup_old_logs())
    } else {
        None
    };

    let filter = EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy();

    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(true)
            .with_filter(filter.clone())
    });

    let (file_layer, guard) = if config.file_output {
        let log_path = config.current_log_path();
        let file = File::options()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {:?}", log_path))?;

        let (writer, worker_guard) = tracing_appender::non_blocking(file);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_thread_names(true)
            .with_filter(filter);

        (
            Some(layer),
            Some(LogGuard {
                _guard: worker_guard,
            }),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Fixture logging at level {}", config.level);
    if config.file_output {
        tracing::info!(
            "Writing '{}' logs to {:?}",
            config.file_prefix,
            config.current_log_path()
        );
    }
    match cleanup {
        Some(Ok(removed)) if removed > 0 => {
            tracing::debug!("Removed {} old '{}' log files", removed, config.file_prefix)
        }
        Some(Err(e)) => tracing::warn!("Failed to clean up old log files: {}", e),
        _ => {}
    }

    Ok(guard)
}
