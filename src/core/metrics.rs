//! Logger metrics for observability
//!
//! Counters describing dispatch activity: how many entries were dispatched,
//! how many handler deliveries happened, how many were filtered by a handler
//! floor and how many handlers failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_ctxlog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_delivery();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.entries_dispatched(), 1);
/// assert_eq!(metrics.deliveries(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Root entries handed to the dispatcher
    entries_dispatched: AtomicU64,

    /// Successful appender calls
    deliveries: AtomicU64,

    /// Appender calls skipped because the entry was below the appender floor
    filtered: AtomicU64,

    /// Appender calls that returned an error
    handler_failures: AtomicU64,

    /// Appender calls that panicked
    handler_panics: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            entries_dispatched: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
            handler_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn entries_dispatched(&self) -> u64 {
        self.entries_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    /// Failures of any kind, panics included
    #[inline]
    pub fn handler_failures(&self) -> u64 {
        self.handler_failures.load(Ordering::Relaxed) + self.handler_panics()
    }

    #[inline]
    pub fn handler_panics(&self) -> u64 {
        self.handler_panics.load(Ordering::Relaxed)
    }

    /// Record a dispatched root entry, returning the previous count
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.entries_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivery(&self) -> u64 {
        self.deliveries.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_failure(&self) -> u64 {
        self.handler_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_panic(&self) -> u64 {
        self.handler_panics.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed appender calls as a percentage of attempted ones (0.0 - 100.0)
    ///
    /// Returns 0.0 if no appender has been called.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.handler_failures() as f64;
        let total = self.deliveries() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.entries_dispatched.store(0, Ordering::Relaxed);
        self.deliveries.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.handler_failures.store(0, Ordering::Relaxed);
        self.handler_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            entries_dispatched: AtomicU64::new(self.entries_dispatched()),
            deliveries: AtomicU64::new(self.deliveries()),
            filtered: AtomicU64::new(self.filtered()),
            handler_failures: AtomicU64::new(self.handler_failures.load(Ordering::Relaxed)),
            handler_panics: AtomicU64::new(self.handler_panics()),
        }
    }
}
