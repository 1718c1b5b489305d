//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (`defmt` feature): Uses defmt
//! - Host (`log` feature): Uses the `log` facade
//! - Unit tests without either feature: Uses println!
//! - Otherwise: No-op (arguments are still type-checked)
//!
//! Arguments must be primitives or `&str` so that every backend can format them.

/// Log informational message
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(feature = "log", not(feature = "defmt")))]
        ::log::info!($($arg)*);

        #[cfg(all(test, not(feature = "log"), not(feature = "defmt")))]
        ::std::println!("[INFO] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(test), not(feature = "log"), not(feature = "defmt")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Log warning message
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(feature = "log", not(feature = "defmt")))]
        ::log::warn!($($arg)*);

        #[cfg(all(test, not(feature = "log"), not(feature = "defmt")))]
        ::std::println!("[WARN] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(test), not(feature = "log"), not(feature = "defmt")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Log error message
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(feature = "log", not(feature = "defmt")))]
        ::log::error!($($arg)*);

        #[cfg(all(test, not(feature = "log"), not(feature = "defmt")))]
        ::std::println!("[ERROR] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(test), not(feature = "log"), not(feature = "defmt")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Log debug message
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(feature = "log", not(feature = "defmt")))]
        ::log::debug!($($arg)*);

        #[cfg(all(test, not(feature = "log"), not(feature = "defmt")))]
        ::std::println!("[DEBUG] {}", ::core::format_args!($($arg)*));

        #[cfg(all(not(test), not(feature = "log"), not(feature = "defmt")))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}
