// src/log.rs
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Log through `tracing` with the level given as the first token.
///
/// `app_log!(info, "Parsed {} jobs", n)` expands to `tracing::info!(...)`.
#[macro_export]
macro_rules! app_log {
    ($level:ident, $($arg:tt)+) => {
        ::tracing::$level!($($arg)+)
    };
}

/// Install the global subscriber: human readable output on stderr, plus a
/// JSON file layer when `log_file` is set. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(false)
                    .with_span_list(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
