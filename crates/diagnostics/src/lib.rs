// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging facade for the standings workspace
//!
//! Every crate logs through the macros exported here so that a single
//! environment variable controls verbosity:
//! - `STANDINGS_LOG=off` (default) - no logs
//! - `STANDINGS_LOG=error|warn|info` - progressively more detail
//! - `STANDINGS_LOG=debug` - generated SQL, probes and resolved buckets

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable consulted by [`init_diagnostics`].
pub const LOG_ENV: &str = "STANDINGS_LOG";

static INIT: Once = Once::new();

/// Outcome of interpreting a `STANDINGS_LOG` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSetting {
    Off,
    Min(emit::Level),
    /// The value was not recognized; logging falls back to `info`.
    Unknown,
}

/// Interpret a `STANDINGS_LOG` value.
pub fn parse_setting(value: &str) -> LogSetting {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => LogSetting::Off,
        "debug" => LogSetting::Min(emit::Level::Debug),
        "info" => LogSetting::Min(emit::Level::Info),
        "warn" => LogSetting::Min(emit::Level::Warn),
        "error" => LogSetting::Min(emit::Level::Error),
        _ => LogSetting::Unknown,
    }
}

/// Initialize diagnostics based on the `STANDINGS_LOG` environment variable.
///
/// Safe to call more than once; only the first call configures emit.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_default();

        let level = match parse_setting(&value) {
            LogSetting::Off => return,
            LogSetting::Min(level) => level,
            LogSetting::Unknown => {
                // Bootstrap warning, emitted before the runtime exists.
                eprintln!("Warning: Unknown {LOG_ENV} value '{value}', using 'info'");
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Operations a user may want to see: queries served, result sizes.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Generated SQL, participating tables, resolved buckets.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Recoverable oddities in stored data, e.g. unparseable capture instants.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Failures surfaced to the caller.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_diagnostics();
    }

    #[test]
    fn test_parse_setting() {
        assert_eq!(parse_setting("off"), LogSetting::Off);
        assert_eq!(parse_setting(""), LogSetting::Off);
        assert_eq!(parse_setting("DEBUG"), LogSetting::Min(emit::Level::Debug));
        assert_eq!(parse_setting(" warn "), LogSetting::Min(emit::Level::Warn));
        assert_eq!(parse_setting("verbose"), LogSetting::Unknown);
    }

    #[test]
    fn test_macros_compile() {
        info!("Test message");
        debug!("Debug message with {value}", value: 42);
        warn!("Warning message");
        error!("Error message");

        let name = String::from("leaderboard");
        let count = 3;
        info!("Seen {count} rows in {name}", count: count, name: name.as_str());
        assert_eq!(name, "leaderboard");
    }
}
