//! Process-wide default logger
//!
//! Libraries can log through [`logger`] or [`get_logger`] without threading a
//! handle around. The application installs its configuration once with
//! [`configure`]. Until then the default is an info-level logger writing to the
//! console (when the `console` feature is enabled).
//!
//! Global loggers look the configuration up on every call, so a logger taken
//! before [`configure`] writes to the new appenders afterwards.

use super::dispatcher::Dispatcher;
use super::log_level::LogLevel;
use super::logger::Logger;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

static GLOBAL_DISPATCHER: OnceLock<RwLock<Option<Arc<Dispatcher>>>> = OnceLock::new();

fn slot() -> &'static RwLock<Option<Arc<Dispatcher>>> {
    GLOBAL_DISPATCHER.get_or_init(|| RwLock::new(None))
}

/// Install the configuration of `logger` as the process-wide default,
/// replacing any previous one.
///
/// Only appenders, level and callbacks are taken over; names come from
/// [`get_logger`].
pub fn configure(logger: Logger) {
    let dispatcher = logger.dispatcher();
    *slot().write() = Some(dispatcher);
}

/// The unnamed process-wide logger
pub fn logger() -> Logger {
    Logger::global(None)
}

/// The process-wide logger under `name`
pub fn get_logger(name: impl Into<String>) -> Logger {
    Logger::global(Some(name.into()))
}

pub fn is_configured() -> bool {
    slot().read().is_some()
}

/// Drop the installed configuration so the next use starts fresh
pub fn reset() {
    *slot().write() = None;
}

/// Current dispatcher, created with defaults on first use
pub(crate) fn dispatcher() -> Arc<Dispatcher> {
    if let Some(dispatcher) = slot().read().as_ref() {
        return Arc::clone(dispatcher);
    }
    let mut installed = slot().write();
    Arc::clone(installed.get_or_insert_with(default_dispatcher))
}

fn default_dispatcher() -> Arc<Dispatcher> {
    let builder = Logger::builder().min_level(LogLevel::Info);
    #[cfg(feature = "console")]
    let builder = builder.appender(crate::appenders::ConsoleAppender::new());
    builder.build().dispatcher()
}
