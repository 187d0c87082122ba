//! Tracing setup.
//!
//! Logs go to a daily-rolling file so they never interleave with the prompt.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` wins over `default_level`.
pub fn init(logs_dir: &Path, default_level: &str) -> Result<()> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("careconnect")
        .filename_suffix("log")
        .build(logs_dir)
        .with_context(|| format!("cannot create log directory {}", logs_dir.display()))?;

    let filter = match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::try_new(directives)?,
        Err(_) => EnvFilter::try_new(default_level)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_target(true)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(())
}
