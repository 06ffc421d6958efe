//! Tracing setup for the order form binary.
//!
//! Log lines go to stderr (never stdout, which carries the form) and
//! optionally to an append-only file. The level filter stays reloadable so
//! the console `log` command can change it at runtime.

use std::fs::File;
use std::io::{self, IsTerminal};
use std::sync::{Mutex, OnceLock};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use crate::config::LoggingSection;

const DEFAULT_LEVEL: &str = "info";

static LEVEL_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// Timestamps in local time with the UTC offset.
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(
        &self,
        w: &mut Writer<'_>,
    ) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// `RUST_LOG` wins, then the configured level, then `info`.
fn make_filter(level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        level
            .and_then(|l| EnvFilter::try_new(l).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
    })
}

/// Installs the global subscriber. Call once at startup; later calls only
/// fail to open the log file or do nothing.
pub fn init_logging(config: &LoggingSection) -> Result<()> {
    let file = match &config.file {
        Some(path) => Some(
            File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?,
        ),
        None => None,
    };

    let (level_filter, level_handle) = reload::Layer::new(make_filter(config.level.as_deref()));

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_timer(LocalTime)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
    });
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_timer(LocalTime)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = LEVEL_HANDLE.set(level_handle);
    }
    Ok(())
}

/// Changes the active log filter. Accepts a bare level or any EnvFilter
/// directive such as `order_core=debug`.
pub fn set_log_level(level: &str) -> Result<()> {
    let Some(handle) = LEVEL_HANDLE.get() else {
        bail!("logging not yet initialized");
    };
    let filter =
        EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}"))?;
    handle
        .reload(filter)
        .map_err(|e| anyhow!("filter reload failed: {e}"))
}
