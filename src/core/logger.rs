//! Main logger implementation

use super::{
    appender::Appender,
    global,
    dispatcher::{Dispatcher, HandlerErrorCallback},
    error::Result,
    exception::ExceptionRecord,
    log_entry::LogEntry,
    log_level::{LevelSpec, LogLevel},
    log_node::Log,
    metrics::LoggerMetrics,
};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Entry point for creating logs.
///
/// A `Logger` is a cheap handle: clones and [named](Logger::named) variants
/// share the same appenders, level and metrics. Loggers obtained from
/// [`global`](crate::global) resolve the installed configuration on every
/// call, so they follow a later [`configure`](crate::global::configure).
#[derive(Clone)]
pub struct Logger {
    name: Option<Arc<str>>,
    binding: Binding,
}

#[derive(Clone, Debug)]
enum Binding {
    Fixed(Arc<Dispatcher>),
    Global,
}

impl Logger {
    /// Info-level logger without appenders
    #[must_use]
    pub fn new() -> Self {
        Self::from_dispatcher(Dispatcher::new(LogLevel::Info))
    }

    fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            name: None,
            binding: Binding::Fixed(Arc::new(dispatcher)),
        }
    }

    /// Handle onto the process-wide configuration
    pub(crate) fn global(name: Option<String>) -> Self {
        Self {
            name: name.map(Arc::from),
            binding: Binding::Global,
        }
    }

    /// A logger sharing this one's configuration under another name
    #[must_use]
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            name: Some(Arc::from(name.into())),
            binding: self.binding.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether this logger follows the process-wide configuration
    pub fn is_global(&self) -> bool {
        matches!(self.binding, Binding::Global)
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.dispatcher().add_appender(appender);
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.dispatcher().set_default_level(level);
    }

    /// Set the default floor from a name, a number or a level
    pub fn set_level(&self, level: impl Into<LevelSpec>) -> Result<()> {
        let level = level.into().resolve()?;
        self.set_min_level(level);
        Ok(())
    }

    pub fn min_level(&self) -> LogLevel {
        self.dispatcher().default_level()
    }

    /// The dispatcher this logger currently delivers through
    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        match &self.binding {
            Binding::Fixed(dispatcher) => Arc::clone(dispatcher),
            Binding::Global => global::dispatcher(),
        }
    }

    /// Snapshot of the dispatch counters
    pub fn metrics(&self) -> LoggerMetrics {
        self.dispatcher().metrics().clone()
    }

    pub fn flush(&self) -> Result<()> {
        self.dispatcher().flush()
    }

    /// Start a log for `event`
    pub fn log(&self, event: impl Into<String>) -> Log {
        Log::new(self.clone(), Some(event.into()))
    }

    /// Start a log whose event is this logger's name
    pub fn new_log(&self) -> Log {
        Log::new(self.clone(), self.name.as_deref().map(str::to_string))
    }

    /// Start a log with fields attached at `level`.
    ///
    /// ```
    /// use rust_ctxlog::prelude::*;
    ///
    /// let logger = Logger::new().named("billing");
    /// let log = logger
    ///     .ctx(LogLevel::Info, &Fields::new().with("invoice", 7))
    ///     .unwrap();
    /// assert_eq!(log.event(), Some("billing"));
    /// log.info("invoice sent");
    /// ```
    pub fn ctx<T: Serialize + ?Sized>(&self, level: LogLevel, fields: &T) -> Result<Log> {
        let mut log = self.new_log();
        log.ctx(level, fields)?;
        Ok(log)
    }

    pub fn debug_ctx<T: Serialize + ?Sized>(&self, fields: &T) -> Result<Log> {
        self.ctx(LogLevel::Debug, fields)
    }

    pub fn error_ctx<T: Serialize + ?Sized>(&self, fields: &T) -> Result<Log> {
        self.ctx(LogLevel::Error, fields)
    }

    /// Start a log carrying `err` as its exception
    pub fn exc<E: Error + ?Sized>(&self, err: &E) -> Log {
        let mut log = self.new_log();
        log.with_exception(ExceptionRecord::from_error(err));
        log
    }

    pub fn emit(&self, level: LogLevel, message: impl Into<String>) {
        self.new_log().emit(level, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.emit(LogLevel::Critical, message);
    }

    pub(crate) fn dispatch(&self, entry: LogEntry, level: LogLevel) -> usize {
        self.dispatcher().dispatch(entry, level)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("binding", &self.binding)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_ctxlog::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .level("debug")
///     .unwrap()
///     .name("api")
///     .appender(ConsoleAppender::new())
///     .on_handler_error(Arc::new(|name: &str, err: &LoggerError| {
///         eprintln!("ALERT: appender {} failed: {}", name, err);
///     }))
///     .build();
/// assert_eq!(logger.min_level(), LogLevel::Debug);
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    name: Option<String>,
    appenders: Vec<Box<dyn Appender>>,
    on_handler_error: Option<HandlerErrorCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            name: None,
            appenders: Vec::new(),
            on_handler_error: None,
        }
    }

    /// Set the floor for appenders without their own
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set the floor from a name or a number, e.g. `"warning"` or `35`
    pub fn level(mut self, level: impl Into<LevelSpec>) -> Result<Self> {
        self.min_level = level.into().resolve()?;
        Ok(self)
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Set a callback for appender failures
    ///
    /// The callback receives the appender name and the error. It runs on the
    /// emitting thread, after the failure has been reported on stderr.
    #[must_use = "builder methods return a new value"]
    pub fn on_handler_error(mut self, callback: HandlerErrorCallback) -> Self {
        self.on_handler_error = Some(callback);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let dispatcher = match self.on_handler_error {
            Some(callback) => Dispatcher::with_error_callback(self.min_level, callback),
            None => Dispatcher::new(self.min_level),
        };
        for appender in self.appenders {
            dispatcher.add_appender(appender);
        }

        let logger = Logger::from_dispatcher(dispatcher);
        match self.name {
            Some(name) => logger.named(name),
            None => logger,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_ctxlog::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_context::Fields;
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Capture {
        entries: Arc<Mutex<Vec<LogEntry>>>,
    }

    impl Appender for Capture {
        fn append(&mut self, entry: &LogEntry) -> Result<()> {
            self.entries.lock().push(entry.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    #[test]
    fn test_builder_basic() {
        let logger = Logger::builder().min_level(LogLevel::Debug).build();
        assert_eq!(logger.min_level(), LogLevel::Debug);
        assert_eq!(logger.dispatcher().appender_count(), 0);
        assert!(logger.name().is_none());
    }

    #[test]
    fn test_builder_level_spec() {
        let logger = Logger::builder().level(38).unwrap().build();
        assert_eq!(logger.min_level(), LogLevel::Error);

        assert!(Logger::builder().level("loud").is_err());
    }

    #[test]
    fn test_builder_name_becomes_event() {
        let logger = Logger::builder().name("worker").build();
        let log = logger.new_log();
        assert_eq!(log.event(), Some("worker"));
    }

    #[test]
    fn test_root_emit_dispatches_once() {
        let capture = Capture::default();
        let logger = Logger::builder().appender(capture.clone()).build();

        let mut log = logger.log("request");
        log.field(LogLevel::Info, "path", "/health");
        log.info("served");

        let entries = capture.entries.lock();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event.as_deref(), Some("request"));
        assert_eq!(entries[0].message.as_deref(), Some("served"));
        assert!(entries[0].timestamp.is_some());
        assert_eq!(logger.metrics().entries_dispatched(), 1);
    }

    #[test]
    fn test_named_loggers_share_appenders() {
        let capture = Capture::default();
        let base = Logger::builder().appender(capture.clone()).build();
        let named = base.named("payments");

        named.warning("slow");
        base.named("auth").error("denied");

        let entries = capture.entries.lock();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event.as_deref(), Some("payments"));
        assert_eq!(base.metrics().deliveries(), 2);
    }

    #[test]
    fn test_ctx_shortcut() {
        let capture = Capture::default();
        let logger = Logger::builder().appender(capture.clone()).build();

        logger
            .ctx(LogLevel::Info, &Fields::new().with("attempt", 3))
            .unwrap()
            .warning("retrying");

        let entries = capture.entries.lock();
        assert_eq!(entries[0].level, LogLevel::Warning);
        assert_eq!(entries[0].fields.len(), 1);
    }

    #[test]
    fn test_below_floor_is_not_delivered() {
        let capture = Capture::default();
        let logger = Logger::builder().appender(capture.clone()).build();

        logger.debug("hidden");
        logger.set_level("debug").unwrap();
        logger.debug("shown");

        let entries = capture.entries.lock();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message.as_deref(), Some("shown"));
    }

    #[test]
    fn test_exc_shortcut() {
        let capture = Capture::default();
        let logger = Logger::builder().appender(capture.clone()).build();

        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timeout");
        logger.exc(&err).error("request failed");

        let entries = capture.entries.lock();
        let exception = entries[0].exception.as_ref().unwrap();
        assert_eq!(exception.value, "upstream timeout");
    }
}
