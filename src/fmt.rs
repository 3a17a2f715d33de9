//! Logging shims.
//!
//! On the board these forward to `defmt` (RTT). Host builds have no global
//! logger, so the arguments are type-checked and then dropped.
#![macro_use]
#![allow(unused_macros)]

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        ::defmt::trace!($($arg)*);
        #[cfg(not(target_os = "none"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        ::defmt::debug!($($arg)*);
        #[cfg(not(target_os = "none"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        ::defmt::info!($($arg)*);
        #[cfg(not(target_os = "none"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(target_os = "none")]
        ::defmt::warn!($($arg)*);
        #[cfg(not(target_os = "none"))]
        let _ = ::core::format_args!($($arg)*);
    }};
}
