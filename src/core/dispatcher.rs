//! Emission dispatcher
//!
//! Fans a composed root entry out to every registered appender whose floor
//! admits the emission level. Each appender sits behind its own mutex, so
//! concurrent dispatches only contend per appender. Appender errors and
//! panics are contained here and never reach the caller.

use super::appender::Appender;
use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Callback invoked with the appender name and the error whenever an appender
/// fails or panics during dispatch
pub type HandlerErrorCallback = Arc<dyn Fn(&str, &LoggerError) + Send + Sync>;

type SharedAppender = Arc<Mutex<Box<dyn Appender>>>;

pub struct Dispatcher {
    default_level: RwLock<LogLevel>,
    appenders: RwLock<Vec<SharedAppender>>,
    metrics: LoggerMetrics,
    on_handler_error: Option<HandlerErrorCallback>,
}

impl Dispatcher {
    pub fn new(default_level: LogLevel) -> Self {
        Self {
            default_level: RwLock::new(default_level),
            appenders: RwLock::new(Vec::new()),
            metrics: LoggerMetrics::new(),
            on_handler_error: None,
        }
    }

    pub fn with_error_callback(default_level: LogLevel, callback: HandlerErrorCallback) -> Self {
        Self {
            on_handler_error: Some(callback),
            ..Self::new(default_level)
        }
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(Arc::new(Mutex::new(appender)));
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    /// Names of the registered appenders, in registration order
    pub fn appender_names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|appender| appender.lock().name().to_string())
            .collect()
    }

    /// Floor applied to appenders that do not declare their own
    pub fn default_level(&self) -> LogLevel {
        *self.default_level.read()
    }

    pub fn set_default_level(&self, level: LogLevel) {
        *self.default_level.write() = level;
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Stamp `entry` and deliver it to every appender admitting `level`.
    ///
    /// Returns the number of appenders that accepted the entry.
    pub fn dispatch(&self, mut entry: LogEntry, level: LogLevel) -> usize {
        entry.timestamp = Some(Utc::now());
        self.metrics.record_dispatched();

        let default_level = self.default_level();
        let mut delivered = 0;

        for appender in self.snapshot() {
            // the guard is released before reporting so the error callback
            // may log through this same dispatcher
            let (outcome, name) = {
                let mut appender = appender.lock();
                let floor = appender.min_level().unwrap_or(default_level);
                if level < floor {
                    self.metrics.record_filtered();
                    continue;
                }

                let outcome = catch_unwind(AssertUnwindSafe(|| appender.append(&entry)));
                let name = match &outcome {
                    Ok(Ok(())) => None,
                    _ => Some(appender.name().to_string()),
                };
                (outcome, name)
            };

            let name = name.unwrap_or_default();
            match outcome {
                Ok(Ok(())) => {
                    self.metrics.record_delivery();
                    delivered += 1;
                }
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", name, e);
                    self.metrics.record_handler_failure();
                    self.report(&name, &e);
                }
                Err(panic_info) => {
                    let panic_msg = panic_message(panic_info.as_ref());
                    eprintln!(
                        "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                         Other appenders continue to function.",
                        name, panic_msg
                    );
                    self.metrics.record_handler_panic();
                    let err = LoggerError::other(format!("appender panicked: {}", panic_msg));
                    self.report(&name, &err);
                }
            }
        }

        delivered
    }

    /// Flush every appender, stopping at the first error
    pub fn flush(&self) -> Result<()> {
        for appender in self.snapshot() {
            appender.lock().flush()?;
        }
        Ok(())
    }

    /// Copy of the appender list so dispatch never holds the list lock
    fn snapshot(&self) -> Vec<SharedAppender> {
        self.appenders.read().clone()
    }

    fn report(&self, name: &str, err: &LoggerError) {
        if let Some(callback) = &self.on_handler_error {
            let callback_result = catch_unwind(AssertUnwindSafe(|| callback(name, err)));
            if callback_result.is_err() {
                eprintln!("[LOGGER ERROR] Handler error callback panicked for '{}'", name);
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("default_level", &self.default_level())
            .field("appenders", &self.appender_names())
            .field("metrics", &self.metrics)
            .finish()
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Recording {
        name: String,
        floor: Option<LogLevel>,
        seen: Arc<Mutex<Vec<LogEntry>>>,
    }

    impl Recording {
        fn new(name: &str, floor: Option<LogLevel>) -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let appender = Self {
                name: name.to_string(),
                floor,
                seen: Arc::clone(&seen),
            };
            (appender, seen)
        }
    }

    impl Appender for Recording {
        fn append(&mut self, entry: &LogEntry) -> Result<()> {
            self.seen.lock().push(entry.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn min_level(&self) -> Option<LogLevel> {
            self.floor
        }
    }

    struct Failing {
        panic: bool,
    }

    impl Appender for Failing {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            if self.panic {
                panic!("disk on fire");
            }
            Err(LoggerError::writer("sink closed"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            if self.panic {
                "panicking"
            } else {
                "failing"
            }
        }
    }

    fn entry(level: LogLevel) -> LogEntry {
        LogEntry::new(level, Utc::now())
    }

    #[test]
    fn test_dispatch_stamps_timestamp() {
        let dispatcher = Dispatcher::new(LogLevel::Debug);
        let (appender, seen) = Recording::new("rec", None);
        dispatcher.add_appender(Box::new(appender));

        assert_eq!(dispatcher.dispatch(entry(LogLevel::Info), LogLevel::Info), 1);
        let seen = seen.lock();
        let stamped = &seen[0];
        assert!(stamped.timestamp.is_some());
        assert!(stamped.timestamp.unwrap() >= stamped.start_time);
    }

    #[test]
    fn test_floor_filtering() {
        let dispatcher = Dispatcher::new(LogLevel::Info);
        let (default_floor, default_seen) = Recording::new("default", None);
        let (error_floor, error_seen) = Recording::new("errors", Some(LogLevel::Error));
        dispatcher.add_appender(Box::new(default_floor));
        dispatcher.add_appender(Box::new(error_floor));

        dispatcher.dispatch(entry(LogLevel::Debug), LogLevel::Debug);
        dispatcher.dispatch(entry(LogLevel::Warning), LogLevel::Warning);
        dispatcher.dispatch(entry(LogLevel::Critical), LogLevel::Critical);

        assert_eq!(default_seen.lock().len(), 2);
        assert_eq!(error_seen.lock().len(), 1);
        assert_eq!(dispatcher.metrics().entries_dispatched(), 3);
        assert_eq!(dispatcher.metrics().filtered(), 3);
    }

    #[test]
    fn test_appender_floor_below_default() {
        let dispatcher = Dispatcher::new(LogLevel::Error);
        let (verbose, seen) = Recording::new("verbose", Some(LogLevel::Debug));
        dispatcher.add_appender(Box::new(verbose));

        dispatcher.dispatch(entry(LogLevel::Debug), LogLevel::Debug);
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_failures_are_isolated() {
        let failures = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&failures);
        let dispatcher = Dispatcher::with_error_callback(
            LogLevel::Info,
            Arc::new(move |_name: &str, _err: &LoggerError| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        dispatcher.add_appender(Box::new(Failing { panic: false }));
        dispatcher.add_appender(Box::new(Failing { panic: true }));
        let (healthy, seen) = Recording::new("healthy", None);
        dispatcher.add_appender(Box::new(healthy));

        let delivered = dispatcher.dispatch(entry(LogLevel::Error), LogLevel::Error);

        assert_eq!(delivered, 1);
        assert_eq!(seen.lock().len(), 1);
        assert_eq!(failures.load(Ordering::SeqCst), 2);
        assert_eq!(dispatcher.metrics().handler_failures(), 2);
        assert_eq!(dispatcher.metrics().handler_panics(), 1);
    }

    #[test]
    fn test_panicking_appender_stays_registered() {
        let dispatcher = Dispatcher::new(LogLevel::Info);
        dispatcher.add_appender(Box::new(Failing { panic: true }));

        dispatcher.dispatch(entry(LogLevel::Info), LogLevel::Info);
        dispatcher.dispatch(entry(LogLevel::Info), LogLevel::Info);
        assert_eq!(dispatcher.appender_count(), 1);
        assert_eq!(dispatcher.metrics().handler_panics(), 2);
    }

    #[test]
    fn test_set_default_level() {
        let dispatcher = Dispatcher::default();
        let (appender, seen) = Recording::new("rec", None);
        dispatcher.add_appender(Box::new(appender));

        dispatcher.dispatch(entry(LogLevel::Debug), LogLevel::Debug);
        dispatcher.set_default_level(LogLevel::Debug);
        dispatcher.dispatch(entry(LogLevel::Debug), LogLevel::Debug);

        assert_eq!(seen.lock().len(), 1);
        assert_eq!(dispatcher.appender_names(), vec!["rec".to_string()]);
    }
}
