//! Logging setup
//!
//! Builds a `tracing` subscriber that writes to stderr, to a daily-rotated
//! file, or both. `RUST_LOG` directives are honoured on top of the
//! configured default level.

use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level
    pub level: Level,

    /// Log to file
    pub file_path: Option<PathBuf>,

    /// Log to stderr
    pub stderr: bool,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,

    /// Include thread IDs
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_path: None,
            stderr: true,
            json: false,
            thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            if let Some(level) = parse_level(&rust_log) {
                config.level = level;
            }
        }

        if let Ok(log_file) = std::env::var("NETMAP_LOG_FILE") {
            config.file_path = Some(PathBuf::from(log_file));
        }

        if let Ok(log_stderr) = std::env::var("NETMAP_LOG_STDERR") {
            config.stderr = log_stderr.to_lowercase() != "false";
        }

        config
    }

    /// Merge settings from the `[logging]` section of the config file
    pub fn with_settings(mut self, settings: &crate::config::LoggingConfig) -> Self {
        if let Some(level) = parse_level(&settings.level) {
            self.level = level;
        }
        if self.file_path.is_none() {
            self.file_path = settings.file.as_ref().map(PathBuf::from);
        }
        self.json = settings.json_format;
        self
    }
}

/// Pick the most verbose level mentioned in a filter string
fn parse_level(directives: &str) -> Option<Level> {
    let lower = directives.to_lowercase();
    if lower.contains("trace") {
        Some(Level::TRACE)
    } else if lower.contains("debug") {
        Some(Level::DEBUG)
    } else if lower.contains("info") {
        Some(Level::INFO)
    } else if lower.contains("warn") {
        Some(Level::WARN)
    } else if lower.contains("error") {
        Some(Level::ERROR)
    } else {
        None
    }
}

/// Initialize logging with the given configuration.
///
/// The returned guard flushes the file writer on drop and must be kept
/// alive for the lifetime of the process.
pub fn init_logging(
    config: LogConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let stderr_layer = if config.stderr {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(!config.json)
            .with_target(true)
            .with_thread_ids(config.thread_ids);
        Some(if config.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        })
    } else {
        None
    };

    let mut guard = None;
    let file_layer = match &config.file_path {
        Some(file_path) => {
            let directory = file_path.parent().unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(directory)?;

            let file_appender = tracing_appender::rolling::daily(
                directory,
                file_path
                    .file_name()
                    .unwrap_or_else(|| std::ffi::OsStr::new("netmap.log")),
            );
            let (writer, worker_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(worker_guard);

            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(config.thread_ids);
            Some(if config.json {
                layer.json().boxed()
            } else {
                layer.boxed()
            })
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
