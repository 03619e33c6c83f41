//! Logging macros for ergonomic log message formatting.
//!
//! These macros format the message like `format!` and hand it to the terminal
//! call of whatever they are given: a [`Logger`](crate::Logger) (one-shot
//! record), a root [`Log`](crate::Log) (consumed and dispatched) or a child
//! [`NodeMut`](crate::NodeMut) (closed).
//!
//! # Examples
//!
//! ```
//! use rust_ctxlog::prelude::*;
//! use rust_ctxlog::{fields, info, warning};
//!
//! let logger = Logger::new();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let log = logger
//!     .ctx(LogLevel::Info, &fields! { "attempt" => 2, "host" => "db-1" })
//!     .unwrap();
//! warning!(log, "Reconnecting after {}ms", 250);
//! ```

/// Emit at an explicit level with automatic formatting.
///
/// ```
/// # use rust_ctxlog::prelude::*;
/// # let logger = Logger::new();
/// use rust_ctxlog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr, $($arg:tt)+) => {
        $target.emit($level, format!($($arg)+))
    };
}

/// Emit at debug level.
///
/// ```
/// # use rust_ctxlog::prelude::*;
/// # let logger = Logger::new();
/// use rust_ctxlog::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Emit at info level.
#[macro_export]
macro_rules! info {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Emit at warning level.
#[macro_export]
macro_rules! warning {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Emit at error level.
///
/// ```
/// # use rust_ctxlog::prelude::*;
/// # let logger = Logger::new();
/// use rust_ctxlog::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Emit at critical level.
#[macro_export]
macro_rules! critical {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Build a [`Fields`](crate::Fields) set from `key => value` pairs.
///
/// ```
/// use rust_ctxlog::fields;
///
/// let fields = fields! { "user_id" => 7, "admin" => false };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Fields::new()$(.with($key, $value))+
    };
}
