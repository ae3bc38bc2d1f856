//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Modules that want them define `const ENABLE_LOGS: bool = true;` and pull
//! the macros in from the crate root; flipping the const silences a chatty
//! module without touching call sites.

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
