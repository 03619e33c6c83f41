//! Stress tests for concurrent dispatch
//!
//! These tests verify:
//! - Records from many threads reach every appender exactly once
//! - Concurrent file writes never interleave within a line
//! - Metrics stay consistent under contention

use parking_lot::Mutex;
use rust_ctxlog::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: usize = 250;

#[derive(Clone, Default)]
struct Counting(Arc<Mutex<Vec<(usize, usize)>>>);

impl Appender for Counting {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let thread = match entry.field("thread") {
            Some(FieldValue::Int(t)) => *t as usize,
            _ => return Err(LoggerError::other("missing thread field")),
        };
        let seq = match entry.field("seq") {
            Some(FieldValue::Int(s)) => *s as usize,
            _ => return Err(LoggerError::other("missing seq field")),
        };
        self.0.lock().push((thread, seq));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[test]
fn test_concurrent_logs_delivered_once() {
    let counting = Counting::default();
    let logger = Logger::builder().appender(counting.clone()).build();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.named(format!("worker-{}", t));
            thread::spawn(move || {
                for seq in 0..RECORDS_PER_THREAD {
                    let mut log = logger.new_log();
                    log.field(LogLevel::Info, "thread", t as i64)
                        .field(LogLevel::Info, "seq", seq as i64);
                    log.chain("step").info("ok");
                    log.info("record");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    let seen = counting.0.lock();
    assert_eq!(seen.len(), THREADS * RECORDS_PER_THREAD);
    let unique: HashSet<_> = seen.iter().copied().collect();
    assert_eq!(unique.len(), THREADS * RECORDS_PER_THREAD);

    // each thread's records arrive in the order they were emitted
    for t in 0..THREADS {
        let order: Vec<usize> = seen.iter().filter(|(th, _)| *th == t).map(|(_, s)| *s).collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    let metrics = logger.metrics();
    assert_eq!(metrics.entries_dispatched(), (THREADS * RECORDS_PER_THREAD) as u64);
    assert_eq!(metrics.deliveries(), (THREADS * RECORDS_PER_THREAD) as u64);
    assert_eq!(metrics.handler_failures(), 0);
}

#[test]
fn test_concurrent_file_lines_stay_whole() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .appender(FileAppender::new(&log_file).expect("Failed to create appender"))
        .build();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                let payload = "x".repeat(512);
                for seq in 0..RECORDS_PER_THREAD {
                    let mut log = logger.log("bulk");
                    log.field(LogLevel::Debug, "payload", payload.as_str())
                        .field(LogLevel::Info, "thread", t as i64)
                        .field(LogLevel::Info, "seq", seq as i64);
                    log.debug("line");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
    logger.flush().expect("Failed to flush");

    let content = std::fs::read_to_string(&log_file).expect("Failed to read log file");
    let mut count = 0;
    for line in content.lines() {
        let parsed: serde_json::Value =
            serde_json::from_str(line).expect("every line is a complete record");
        assert_eq!(parsed["payload"].as_str().map(str::len), Some(512));
        count += 1;
    }
    assert_eq!(count, THREADS * RECORDS_PER_THREAD);
}

#[test]
fn test_level_changes_during_dispatch() {
    let counting = Counting::default();
    let logger = Logger::builder().appender(counting.clone()).build();

    let toggler = {
        let logger = logger.clone();
        thread::spawn(move || {
            for i in 0..500 {
                let level = if i % 2 == 0 {
                    LogLevel::Critical
                } else {
                    LogLevel::Info
                };
                logger.set_min_level(level);
            }
            logger.set_min_level(LogLevel::Info);
        })
    };

    let writer = {
        let logger = logger.clone();
        thread::spawn(move || {
            for seq in 0..500 {
                logger
                    .new_log()
                    .with_field(LogLevel::Info, "thread", 0)
                    .with_field(LogLevel::Info, "seq", seq as i64)
                    .info("maybe");
            }
        })
    };

    toggler.join().expect("toggler panicked");
    writer.join().expect("writer panicked");

    let metrics = logger.metrics();
    assert_eq!(metrics.entries_dispatched(), 500);
    assert_eq!(metrics.deliveries() + metrics.filtered(), 500);
    assert_eq!(counting.0.lock().len() as u64, metrics.deliveries());
}
