//! Logging system configuration and initialization
//!
//! This module provides the logging setup for the scraper binaries:
//! - Console output on stdout (progress lines)
//! - Optional file logging under `<output_dir>/logs`
//! - Structured JSON file logs (optional)
//! - Local-time timestamps

use anyhow::{Result, anyhow};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

/// File name of the log written when file output is enabled
pub const LOG_FILE_NAME: &str = "scraper.log";

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<tracing_appender::non_blocking::WorkerGuard>> = Mutex::new(Vec::new());
}

/// Local wall-clock time formatter
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Log directory inside the output directory
pub fn get_log_directory(output_dir: &Path) -> PathBuf {
    output_dir.join("logs")
}

/// Build the level filter. `RUST_LOG` wins over the configured level.
///
/// HTTP client internals are held at `warn` unless the level is `trace`.
fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level).map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?;

    if !level.to_lowercase().contains("trace") {
        for directive in ["reqwest=warn", "hyper=warn", "hyper_util=warn", "h2=warn", "html5ever=warn", "selectors=warn"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }

    Ok(filter)
}

/// Initialize logging with the given configuration
///
/// Calling this twice in one process is an error from the subscriber registry,
/// so binaries call it exactly once at startup.
pub fn init_logging(config: &LoggingConfig, output_dir: &Path) -> Result<()> {
    let env_filter = build_env_filter(&config.level)?;

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    let file_layer = if config.file_output {
        let log_dir = get_log_directory(output_dir);
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

        let file_appender = rolling::never(&log_dir, LOG_FILE_NAME);
        let (file_writer, file_guard) = non_blocking(file_appender);

        // Store the guard globally to prevent it from being dropped
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry poisoned"))?
            .push(file_guard);

        let layer = fmt::Layer::new()
            .with_writer(file_writer)
            .with_timer(LocalTimeFormatter)
            .with_ansi(false);

        Some(if config.json_format {
            layer.json().with_target(true).with_file(true).with_line_number(true).boxed()
        } else {
            layer.with_target(false).boxed()
        })
    } else {
        None
    };

    if console_layer.is_none() && file_layer.is_none() {
        return Err(anyhow!("No logging output configured"));
    }

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    info!("Logging system initialized (level: {})", config.level);
    if config.file_output {
        info!("Log file: {:?}", get_log_directory(output_dir).join(LOG_FILE_NAME));
    }

    Ok(())
}

/// Log run information for diagnostics
pub fn log_system_info() {
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
}
