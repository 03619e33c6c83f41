//! # rust_ctxlog
//!
//! Structured logging built around context that is accumulated first and
//! emitted once.
//!
//! ## Features
//!
//! - **Level-scoped fields**: context attached at `debug` only shows up when
//!   the log is emitted at `debug`, while fields attached at `error` stay
//!   hidden from routine `info` records
//! - **Nested logs**: chain child logs under a root and emit one composed
//!   record with all of them
//! - **Multiple appenders**: console and file (with rotation), each with its
//!   own severity floor
//! - **Failure isolation**: a failing or panicking appender never affects the
//!   caller or the other appenders
//!
//! ## Example
//!
//! ```
//! use rust_ctxlog::prelude::*;
//!
//! let logger = Logger::builder()
//!     .appender(ConsoleAppender::with_colors(false))
//!     .build();
//!
//! let mut log = logger.log("checkout");
//! log.field(LogLevel::Info, "user_id", 42)
//!     .field(LogLevel::Debug, "cart_size", 3)
//!     .field(LogLevel::Error, "payment_payload", "{...}");
//! log.chain("reserve_stock").info("reserved");
//! log.info("order placed");
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    #[cfg(feature = "file")]
    pub use crate::appenders::{FileAppender, RotationPolicy, RotationStrategy};
    pub use crate::core::global::{configure, get_logger};
    pub use crate::core::{
        Appender, ExceptionRecord, FieldValue, Fields, LevelSpec, Log, LogEntry, LogLevel,
        Logger, LoggerBuilder, LoggerError, LoggerMetrics, NodeId, NodeMut, OutputFormat, Result,
        TimestampFormat,
    };
}

#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
#[cfg(feature = "file")]
pub use appenders::FileAppender;
pub use core::global;
pub use core::{
    Appender, ContextStore, Dispatcher, ExceptionRecord, FieldMap, FieldValue, Fields,
    HandlerErrorCallback, LevelSpec, Log, LogEntry, LogLevel, LogNode, LogTree, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, NodeId, NodeMut, NodeState, OutputFormat, Result,
    TimestampFormat,
};
