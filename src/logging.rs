//! Logging configuration using the tracing framework
//!
//! This module sets up structured logging with different levels and outputs.
//! Logs can be controlled via the RUST_LOG environment variable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// This sets up tracing with:
/// - Environment-based log level filtering (RUST_LOG)
/// - Formatted output with timestamps
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log level (e.g., "debug", "info", "warn", "error")
///   - Default: "bezetting=info"
///   - Examples:
///     - `RUST_LOG=debug` - Show all debug logs
///     - `RUST_LOG=bezetting=trace` - Show trace logs for this crate only
///     - `RUST_LOG=bezetting::dashboard=debug` - Debug logs for the fetch layer only
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bezetting=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

/// Initialize logging with file output
///
/// Writes all logs to both stderr and a daily-rolling file in the system's
/// log directory. Used when the interactive UI owns the terminal and plain
/// stderr output would corrupt the alternate screen.
pub fn init_with_file(log_file_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let log_dir =
        if let Some(proj_dirs) = directories::ProjectDirs::from("nl", "bezetting", "bezetting") {
            let log_path = proj_dirs.data_dir().join("logs");
            std::fs::create_dir_all(&log_path)?;
            log_path
        } else {
            std::env::current_dir()?
        };

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_file_name);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bezetting=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

/// Initialize logging for tests
///
/// Only errors are shown by default; safe to call more than once.
#[allow(dead_code)]
pub fn init_test() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init()
        .ok();
}


// Made with Bob
