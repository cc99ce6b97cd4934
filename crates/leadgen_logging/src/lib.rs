#![deny(missing_docs)]
//! Shared logging utilities for the lead generation workspace.
//!
//! This crate provides the `leadgen_*` logging macros used by the core,
//! the engine and the app, plus a test initializer for the global logger.

/// Log target used for messages about backend traffic.
pub const API_TARGET: &str = "leadgen::api";

/// Log target used for messages about job polling.
pub const POLL_TARGET: &str = "leadgen::poll";

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! leadgen_trace {
    (target: $target:expr, $($arg:tt)*) => {{
        log::trace!(target: $target, $($arg)*);
    }};
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! leadgen_debug {
    (target: $target:expr, $($arg:tt)*) => {{
        log::debug!(target: $target, $($arg)*);
    }};
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! leadgen_info {
    (target: $target:expr, $($arg:tt)*) => {{
        log::info!(target: $target, $($arg)*);
    }};
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! leadgen_warn {
    (target: $target:expr, $($arg:tt)*) => {{
        log::warn!(target: $target, $($arg)*);
    }};
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! leadgen_error {
    (target: $target:expr, $($arg:tt)*) => {{
        log::error!(target: $target, $($arg)*);
    }};
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a terminal logger for use in tests.
///
/// Safe to call from every test: it no-ops once a logger is installed.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // A previous test may already have installed the logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Never,
    )]);
}
