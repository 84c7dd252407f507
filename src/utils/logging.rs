//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Each module that uses them defines its own flag:
//! ```rust
//! const ENABLE_LOGS: bool = true;
//! ```
//! and imports the macros from the crate root:
//! ```ignore
//! use crate::{log_error, log_info, log_warn};
//! ```

/// Conditional info logging; checks `ENABLE_LOGS` in the calling module.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional warn logging; checks `ENABLE_LOGS` in the calling module.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Conditional error logging; checks `ENABLE_LOGS` in the calling module.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
