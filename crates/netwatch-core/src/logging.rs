//! File logging
//!
//! Stdout belongs to the display sink, so log lines go to a daily rotated file
//! under `<data_local_dir>/netwatch/logs/`. A directive in `NETWATCH_LOG`
//! replaces [`DEFAULT_FILTER`] entirely.

use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV_VAR: &str = "NETWATCH_LOG";

/// Filter used when `NETWATCH_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str =
    "netwatch=info,netwatch_core=info,netwatch_probe=info,netwatch_app=info,warn";

const LOG_FILE_PREFIX: &str = "netwatch.log";

/// Directory the log files are written to
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("netwatch")
        .join("logs")
}

/// Install the global subscriber writing to [`log_directory`].
///
/// ```bash
/// NETWATCH_LOG=debug netwatch wg0
/// NETWATCH_LOG=netwatch_app=trace,warn netwatch wg0
/// ```
pub fn init() -> Result<()> {
    let dir = log_directory();
    let directives = std::env::var(LOG_ENV_VAR).ok();
    init_in(&dir, build_filter(directives.as_deref()))?;

    tracing::info!(
        "netwatch {} logging to {}",
        env!("CARGO_PKG_VERSION"),
        dir.display()
    );
    Ok(())
}

fn init_in(dir: &Path, filter: EnvFilter) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()
        .map_err(|e| Error::logging(e.to_string()))
}

/// Parse user directives, falling back to [`DEFAULT_FILTER`]
fn build_filter(directives: Option<&str>) -> EnvFilter {
    match directives.map(EnvFilter::try_new) {
        Some(Ok(filter)) => filter,
        Some(Err(e)) => {
            // No subscriber yet; stderr is the only place this can go
            eprintln!("netwatch: ignoring {}: {}", LOG_ENV_VAR, e);
            EnvFilter::new(DEFAULT_FILTER)
        }
        None => EnvFilter::new(DEFAULT_FILTER),
    }
}
