//! Logging setup for applications embedding the receipt subsystem
//!
//! The library only emits `tracing` events; the host calls one of these once
//! at startup. Optional file output rotates daily and keeps two weeks.

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// Daily log files kept before the oldest is deleted
const MAX_LOG_FILES: usize = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging to the console and, with `log_dir`, to daily files
///
/// # Arguments
/// * `level` - filter directive (e.g. "info", "crab_receipt=debug,warn")
/// * `json_format` - JSON lines for production, pretty output for development
/// * `log_dir` - directory for `receipt.YYYY-MM-DD.log` files
///
/// # Examples
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// crab_receipt::logger::init_logger_with_file("info", true, Some("./work_dir/logs"))?;
/// # Ok(())
/// # }
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level)?;

    let mut layers = vec![console_layer(json_format)];
    if let Some(dir) = log_dir {
        layers.push(file_layer(Path::new(dir), json_format)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(())
}

/// Initialize console-only logging
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

fn console_layer(json_format: bool) -> BoxedLayer {
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    }
}

fn file_layer(dir: &Path, json_format: bool) -> anyhow::Result<BoxedLayer> {
    fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("receipt")
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)?;

    let layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_writer(appender)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .with_writer(appender)
            .boxed()
    };
    Ok(layer)
}
