//! Tracing setup for the court booking binaries and tests.
//!
//! Output goes through one `fmt` layer. `RUST_LOG` selects what is shown;
//! the `courtbook*` crates are additionally raised to the requested level.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable read by [`init`] for the workspace log level.
pub const LOG_LEVEL_VAR: &str = "COURTBOOK_LOG";

/// Installs the subscriber at the level named by `COURTBOOK_LOG`, or INFO.
///
/// # Examples
///
/// ```
/// use courtbook_common::logging;
///
/// logging::init();
/// ```
pub fn init() {
    let level = std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|raw| parse_level(&raw))
        .unwrap_or(Level::INFO);
    init_with_level(level);
}

/// Installs the subscriber with the `courtbook*` crates at `level`.
///
/// A second call is a no-op; the first subscriber stays installed.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("courtbook={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Logging at {} for courtbook crates", level);
    }
}

/// `trace`, `debug`, `info`, `warn` or `error`, in any case.
pub fn parse_level(raw: &str) -> Option<Level> {
    raw.trim().parse().ok()
}

/// Logs the outcome of `result` and hands it back unchanged.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    done: &str,
    failed: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", done),
        Err(err) => error!("{}: {}", failed, err),
    }
    result
}
