//! Output format configuration for log entries
//!
//! Provides the two renderings an appender can choose from:
//! - Text: human-readable, one header line plus exception and child lines
//! - Json: the composed record as a single JSON object

use super::error::Result;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde_json::Value;
use std::fmt::Write as _;

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example:
    /// ```text
    /// 2025-01-08T10:30:45.123Z [ERROR] checkout: payment failed order_id=991
    /// Exception: GatewayError: timeout
    /// Child logs:
    ///   1. [INFO] charge: card declined
    /// ```
    #[default]
    Text,

    /// JSON format for machine processing, one object per record
    Json,
}

impl OutputFormat {
    /// Render `entry` without a trailing newline
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(format_text(entry, timestamp_format)),
            OutputFormat::Json => format_json(entry, timestamp_format),
        }
    }
}

/// Replace line breaks and tabs so one field cannot forge extra log lines
fn sanitize(value: &str) -> String {
    value
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn format_text(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let timestamp = entry.timestamp.unwrap_or(entry.start_time);
    let mut line = format!(
        "{} [{}] {}: {}",
        timestamp_format.format(&timestamp),
        entry.level.to_str().to_uppercase(),
        sanitize(entry.event.as_deref().unwrap_or("")),
        sanitize(entry.message.as_deref().unwrap_or("")),
    );

    for (key, value) in &entry.fields {
        let _ = write!(line, " {}={}", sanitize(key), sanitize(&value.to_string()));
    }

    if let Some(exception) = &entry.exception {
        let _ = write!(line, "\nException: {}: {}", exception.type_name, exception.value);
        if let Some(traceback) = &exception.traceback {
            line.push('\n');
            line.push_str(traceback);
        }
    }

    if !entry.children.is_empty() {
        line.push_str("\nChild logs:");
        for (i, child) in entry.children.iter().enumerate() {
            let _ = write!(
                line,
                "\n  {}. [{}] {}: {}",
                i + 1,
                child.level.to_str().to_uppercase(),
                sanitize(child.event.as_deref().unwrap_or("")),
                sanitize(child.message.as_deref().unwrap_or("")),
            );
        }
    }

    line
}

fn format_json(entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
    let mut value = serde_json::to_value(entry)?;
    apply_timestamp_format(&mut value, timestamp_format);
    Ok(serde_json::to_string(&value)?)
}

/// Rewrite `start_time` and `timestamp` of a record and its children
fn apply_timestamp_format(value: &mut Value, timestamp_format: &TimestampFormat) {
    let Some(object) = value.as_object_mut() else {
        return;
    };

    for key in ["start_time", "timestamp"] {
        if let Some(slot) = object.get_mut(key) {
            let parsed = slot
                .as_str()
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok());
            if let Some(datetime) = parsed {
                *slot = timestamp_format.format_json(&datetime.with_timezone(&chrono::Utc));
            }
        }
    }

    if let Some(Value::Array(children)) = object.get_mut("children") {
        for child in children {
            apply_timestamp_format(child, timestamp_format);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exception::ExceptionRecord;
    use crate::core::field_value::FieldValue;
    use crate::core::log_level::LogLevel;
    use chrono::{TimeZone, Utc};

    fn entry() -> LogEntry {
        let start = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().unwrap();
        let mut entry = LogEntry::new(LogLevel::Error, start);
        entry.event = Some("checkout".into());
        entry.message = Some("payment failed".into());
        entry.fields.insert("order_id".into(), FieldValue::Int(991));
        entry.timestamp = Some(start + chrono::Duration::milliseconds(250));
        entry
    }

    #[test]
    fn test_text_header_line() {
        let result = OutputFormat::Text.format(&entry(), &TimestampFormat::Iso8601).unwrap();
        assert_eq!(
            result,
            "2025-01-08T10:30:45.250Z [ERROR] checkout: payment failed order_id=991"
        );
    }

    #[test]
    fn test_text_exception_and_children() {
        let mut entry = entry();
        entry.exception =
            Some(ExceptionRecord::new("GatewayError", "timeout").with_traceback("at charge()"));
        let mut child = LogEntry::new(LogLevel::Info, entry.start_time);
        child.event = Some("charge".into());
        child.message = Some("card declined".into());
        entry.children.push(child);

        let result = OutputFormat::Text.format(&entry, &TimestampFormat::Iso8601).unwrap();
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[1], "Exception: GatewayError: timeout");
        assert_eq!(lines[2], "at charge()");
        assert_eq!(lines[3], "Child logs:");
        assert_eq!(lines[4], "  1. [INFO] charge: card declined");
    }

    #[test]
    fn test_text_sanitizes_line_breaks() {
        let mut entry = entry();
        entry.message = Some("line one\nFAKE [CRITICAL] injected".into());
        let result = OutputFormat::Text.format(&entry, &TimestampFormat::Iso8601).unwrap();
        assert_eq!(result.lines().count(), 1);
        assert!(result.contains("line one\\nFAKE"));
    }

    #[test]
    fn test_json_format() {
        let result = OutputFormat::Json.format(&entry(), &TimestampFormat::Iso8601).unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["level"], "error");
        assert_eq!(parsed["message"], "payment failed");
        assert_eq!(parsed["order_id"], 991);
        assert_eq!(parsed["start_time"], "2025-01-08T10:30:45.000Z");
        assert_eq!(parsed["timestamp"], "2025-01-08T10:30:45.250Z");
    }

    #[test]
    fn test_json_numeric_timestamps_in_children() {
        let mut entry = entry();
        entry.children.push(LogEntry::new(LogLevel::Info, entry.start_time));

        let result = OutputFormat::Json.format(&entry, &TimestampFormat::Unix).unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["timestamp"], 1736332245);
        assert_eq!(parsed["children"][0]["start_time"], 1736332245);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
