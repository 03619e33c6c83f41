//! Composed log entry
//!
//! A `LogEntry` is the handler-ready projection of a log node and its
//! children. Field order is fixed: reserved keys first, then context fields,
//! then `exception`, `children` and the dispatch `timestamp`.

use super::exception::ExceptionRecord;
use super::field_value::{FieldMap, FieldValue};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Keys owned by the entry itself; context fields never override them
pub const RESERVED_KEYS: [&str; 7] = [
    "level",
    "start_time",
    "event",
    "message",
    "exception",
    "children",
    "timestamp",
];

pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: FieldMap,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exception: Option<ExceptionRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<LogEntry>,
    /// Set by the dispatcher, never by composition
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl LogEntry {
    pub fn new(level: LogLevel, start_time: DateTime<Utc>) -> Self {
        Self {
            level,
            start_time,
            event: None,
            message: None,
            fields: FieldMap::new(),
            exception: None,
            children: Vec::new(),
            timestamp: None,
        }
    }

    /// Look up a context field
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Number of entries in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(LogEntry::count).sum::<usize>()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
