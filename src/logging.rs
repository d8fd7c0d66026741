//! Logging bootstrap for the binary. The library only talks to the [`log`]
//! facade; this module wires the facade to `flexi_logger` writing to stderr.
//!
//! # Invariants
//! - Initialization happens at most once per process.
//! - Calling [`init_logging`] again with the same level is a no-op.
//! - `RUST_LOG`, when set, takes precedence over the requested level.

use flexi_logger::{Logger, LoggerHandle};
use once_cell::sync::OnceCell;

const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Starts logging at `level` (`off`, `error`, `warn`, `info`, `debug`, or
/// `trace`, case-insensitive).
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when logging was already started with another level.
/// - Returns an error when the logger backend fails to start.
pub fn init_logging(level: &str) -> Result<(), String> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        if state.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                state.level, level
            ));
        }
        return Ok(());
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_env_or_str(level)
            .map_err(|err| format!("invalid log specification `{}`: {}", level, err))?
            .start()
            .map_err(|err| format!("failed to start logger: {}", err))?;
        Ok(LoggingState {
            level,
            _logger: logger,
        })
    })?;
    log::debug!("logging started at `{}`", state.level);
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    let lowered = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .copied()
        .find(|known| *known == lowered)
        .ok_or_else(|| format!("unsupported log level `{}`", level))
}
