//! Basic logger usage example
//!
//! Demonstrates one-shot records, level-scoped fields and the default floor.
//!
//! Run with: cargo run --example basic_usage

use rust_ctxlog::prelude::*;
use rust_ctxlog::{fields, info};

fn main() -> Result<()> {
    println!("=== rust_ctxlog - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .name("shop")
        .min_level(LogLevel::Debug)
        .appender(ConsoleAppender::new())
        .build();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warning("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");

    println!("\n2. Fields scoped to the level they matter at:");
    let mut log = logger.log("checkout");
    log.field(LogLevel::Info, "user_id", 42)
        .field(LogLevel::Debug, "cart_size", 3)
        .field(LogLevel::Error, "payment_payload", "{\"card\": \"****\"}");
    log.info("order placed (payload hidden)");

    let log = logger.error_ctx(&fields! { "payment_payload" => "{\"card\": \"****\"}" })?;
    log.with_field(LogLevel::Info, "user_id", 42)
        .error("payment failed (payload shown)");

    println!("\n3. Raising the floor to warning:");
    logger.set_level("warning")?;
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    logger.warning("Warning message (visible)");

    println!("\n4. Macros and exceptions:");
    logger.set_min_level(LogLevel::Info);
    let port = 8080;
    info!(logger, "Listening on port {}", port);
    if let Err(e) = "80a".parse::<u16>() {
        logger.exc(&e).error("Bad port in config");
    }

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
