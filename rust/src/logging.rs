//! Logging macros for the queue and search driver with verbosity level control.
//!
//! Format arguments are only evaluated when the level is enabled.
//! Verbosity levels:
//! - 0: SILENT (only errors)
//! - 1: CHANGES (capacity growth, search results)
//! - 2: CHECKS (per-expansion details)
//! - 3: DEBUG (release counts on finalize)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log to stderr when `verbosity` reaches `level`.
#[macro_export]
macro_rules! log_at {
    ($level:expr, $verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $level {
            eprintln!($($arg)*);
        }
    };
}

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: storage growth, search completion.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHANGES, $verbosity, $($arg)*)
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: node expansions, stale frontier entries.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_CHECKS, $verbosity, $($arg)*)
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        $crate::log_at!($crate::logging::VERBOSITY_DEBUG, $verbosity, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_arguments_only_evaluated_when_enabled() {
        let calls = Cell::new(0);
        let touch = || {
            calls.set(calls.get() + 1);
            calls.get()
        };

        log_changes!(VERBOSITY_SILENT, "grew {}", touch());
        log_checks!(VERBOSITY_CHANGES, "expanded {}", touch());
        log_debug!(VERBOSITY_CHECKS, "released {}", touch());
        assert_eq!(calls.get(), 0);

        log_changes!(VERBOSITY_CHANGES, "grew {}", touch());
        log_checks!(VERBOSITY_DEBUG, "expanded {}", touch());
        log_debug!(VERBOSITY_DEBUG, "released {}", touch());
        assert_eq!(calls.get(), 3);
    }
}
