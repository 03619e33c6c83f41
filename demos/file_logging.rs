//! File logging example
//!
//! Demonstrates JSON and text files side by side, a per-file severity floor
//! and size-based rotation with compressed backups.
//!
//! Run with: cargo run --example file_logging

use rust_ctxlog::prelude::*;

fn main() -> Result<()> {
    println!("=== rust_ctxlog - File Logging Example ===\n");

    let json_file = FileAppender::new("logs/application.jsonl")?.with_rotation(
        RotationPolicy::new()
            .with_strategy(RotationStrategy::size_str("64kb")?)
            .with_max_backups(3)
            .with_compression(true),
    );
    let errors_file = FileAppender::new("logs/errors.log")?
        .with_output_format(OutputFormat::Text)
        .with_min_level(LogLevel::Error);

    let logger = Logger::builder()
        .min_level(LogLevel::Debug)
        .appender(ConsoleAppender::new().with_min_level(LogLevel::Info))
        .appender(json_file)
        .appender(errors_file)
        .build();

    println!("1. Records fan out to every appender that admits them:");
    logger.info("Application started");
    logger.debug("Loading configuration (files only)");
    logger.warning("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("\n2. Enough records to trigger a rotation:");
    for i in 1..=500 {
        let mut log = logger.log("import");
        log.field(LogLevel::Info, "item", i)
            .field(LogLevel::Debug, "payload", "x".repeat(100));
        log.debug(format!("Processed item {}/500", i));
    }

    logger.info("All operations completed");
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/' for application.jsonl, its rotated backups and errors.log");
    Ok(())
}
