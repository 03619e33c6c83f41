//! Exception details attached to a log node

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Type, display value and optional trace of an error.
///
/// The trace is the rendered `source()` chain of the error, when it has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub traceback: Option<String>,
}

impl ExceptionRecord {
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
            traceback: None,
        }
    }

    #[must_use]
    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }

    /// Capture an error by its static type.
    ///
    /// ```
    /// use rust_ctxlog::ExceptionRecord;
    ///
    /// let err = "abc".parse::<i32>().unwrap_err();
    /// let record = ExceptionRecord::from_error(&err);
    /// assert_eq!(record.type_name, "ParseIntError");
    /// assert_eq!(record.value, "invalid digit found in string");
    /// assert!(record.traceback.is_none());
    /// ```
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        Self {
            type_name: short_type_name(std::any::type_name::<E>()),
            value: err.to_string(),
            traceback: source_chain(err),
        }
    }
}

impl fmt::Display for ExceptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.value)
    }
}

/// Strip module paths, keeping generic arguments intact
fn short_type_name(full: &str) -> String {
    let (path, generics) = match full.find('<') {
        Some(idx) => full.split_at(idx),
        None => (full, ""),
    };
    let base = path.rsplit("::").next().unwrap_or(path);
    format!("{}{}", base, generics)
}

fn source_chain<E: Error + ?Sized>(err: &E) -> Option<String> {
    let mut source = err.source();
    if source.is_none() {
        return None;
    }

    let mut lines = vec![err.to_string()];
    while let Some(cause) = source {
        lines.push(format!("Caused by: {}", cause));
        source = cause.source();
    }
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer {
        inner: std::io::Error,
    }

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "failed to load config")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.inner)
        }
    }

    #[test]
    fn test_from_error_without_source() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let record = ExceptionRecord::from_error(&err);
        assert_eq!(record.type_name, "Error");
        assert_eq!(record.value, "missing");
        assert_eq!(record.traceback, None);
    }

    #[test]
    fn test_from_error_with_source_chain() {
        let err = Outer {
            inner: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let record = ExceptionRecord::from_error(&err);
        assert_eq!(record.type_name, "Outer");
        assert_eq!(
            record.traceback.as_deref(),
            Some("failed to load config\nCaused by: denied")
        );
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("std::io::error::Error"), "Error");
        assert_eq!(short_type_name("app::Wrapper<std::string::String>"), "Wrapper<std::string::String>");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_serialized_keys() {
        let record = ExceptionRecord::new("ValueError", "bad input");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"type":"ValueError","value":"bad input"}"#);
    }
}
