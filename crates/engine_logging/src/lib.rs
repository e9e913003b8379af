#![deny(missing_docs)]
//! Shared logging utilities for the scrollback workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Log lines emitted
//! through the macros are tagged with the current harvest pass so a capture
//! run can be reconstructed from its log output.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current harvest pass number.
    static HARVEST_PASS: Cell<u64> = const { Cell::new(0) };
}

/// Sets the harvest pass number for the current thread.
/// The acquisition loop calls this once per pass before harvesting.
pub fn set_pass(pass: u64) {
    HARVEST_PASS.with(|v| v.set(pass));
}

/// Retrieves the harvest pass number for the current thread.
/// Returns 0 if no pass has been recorded yet.
pub fn current_pass() -> u64 {
    HARVEST_PASS.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current harvest pass.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current harvest pass.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current harvest pass.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current harvest pass.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current harvest pass.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
