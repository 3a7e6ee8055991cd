//! Logging macros.
//!
//! The navigation stack logs through a small set of macros that forward to
//! the [`log`](https://docs.rs/log) crate or the
//! [`tracing`](https://docs.rs/tracing) crate, whichever feature is enabled.
//! Enable at most one of them; with neither enabled every macro expands to
//! nothing.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Level conventions used throughout the crate:
//!
//! - `info_log!`: a structural mutation finished (push, pop, present, dismiss, reload).
//! - `debug_log!`: queue advancement, phase changes, pops that had nothing to remove.
//! - `trace_log!`: per-page transforms and teardown.
//! - `warn_log!`: released backends, dropped completions, failed spawns.
//! - `error_log!`: component resolution failures.
//!
//! ```ignore
//! use gpui_stack_navigator::{debug_log, info_log};
//!
//! info_log!("Pushed page {} ('{}')", key, path);
//! debug_log!("Pop ignored: layer {} has a single page", layer);
//! ```

/// Shared dispatch for the level macros below. Not part of the public API.
#[doc(hidden)]
#[macro_export]
macro_rules! __nav_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
    };
}

/// Emit a **trace**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__nav_log!(trace, $($arg)*) };
}

/// Emit a **debug**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__nav_log!(debug, $($arg)*) };
}

/// Emit an **info**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__nav_log!(info, $($arg)*) };
}

/// Emit a **warn**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__nav_log!(warn, $($arg)*) };
}

/// Emit an **error**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__nav_log!(error, $($arg)*) };
}
