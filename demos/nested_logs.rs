//! Nested logs example
//!
//! Builds a tree of child logs under one request and emits it as a single
//! record, first as text and then as JSON.
//!
//! Run with: cargo run --example nested_logs

use rust_ctxlog::prelude::*;
use std::fmt;

#[derive(Debug)]
struct GatewayTimeout {
    after_ms: u64,
}

impl fmt::Display for GatewayTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gateway did not answer within {}ms", self.after_ms)
    }
}

impl std::error::Error for GatewayTimeout {}

fn handle_request(logger: &Logger, order_id: i64) {
    let mut log = logger.log("POST /orders");
    log.field(LogLevel::Info, "order_id", order_id)
        .field(LogLevel::Debug, "client", "10.0.0.7")
        .field(LogLevel::Error, "body", "{\"items\": [1, 2]}");

    log.chain("reserve_stock")
        .field(LogLevel::Info, "items", 2)
        .info("stock reserved");

    let charge = {
        let mut charge = log.chain("charge");
        charge.field(LogLevel::Info, "attempt", 1);
        charge
            .chain("gateway")
            .exc(&GatewayTimeout { after_ms: 3000 })
            .warning("timed out");
        charge.id()
    };

    if order_id % 2 == 0 {
        if let Some(mut charge) = log.node(charge) {
            charge.field(LogLevel::Info, "attempt", 2).info("charged on retry");
        }
        log.info("order placed");
    } else {
        if let Some(mut charge) = log.node(charge) {
            charge.error("giving up");
        }
        log.error("order failed");
    }
}

fn main() {
    println!("=== rust_ctxlog - Nested Logs Example ===\n");

    let text = Logger::builder()
        .appender(ConsoleAppender::new())
        .build();
    println!("1. Text output (the failed order shows its error-level body):");
    handle_request(&text, 10);
    handle_request(&text, 11);

    let json = Logger::builder()
        .appender(ConsoleAppender::new().with_output_format(OutputFormat::Json))
        .build();
    println!("\n2. JSON output:");
    handle_request(&json, 12);

    println!("\n=== Example completed successfully! ===");
}
