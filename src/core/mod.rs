//! Core logger types and traits

pub mod appender;
pub mod composer;
pub mod dispatcher;
pub mod error;
pub mod exception;
pub mod field_value;
pub mod global;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod log_node;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod timestamp;

pub use appender::Appender;
pub use composer::{compose, compose_node};
pub use dispatcher::{Dispatcher, HandlerErrorCallback};
pub use error::{LoggerError, Result};
pub use exception::ExceptionRecord;
pub use field_value::{FieldMap, FieldValue};
pub use log_context::{ContextStore, Fields};
pub use log_entry::{is_reserved_key, LogEntry, RESERVED_KEYS};
pub use log_level::{LevelSpec, LogLevel};
pub use log_node::{Log, LogNode, LogTree, NodeId, NodeMut, NodeState};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use timestamp::TimestampFormat;
