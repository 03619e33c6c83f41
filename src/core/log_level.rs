//! Log level definitions

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 10,
    #[default]
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl LogLevel {
    /// Every level, lowest rank first
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    const NAMES: [&'static str; 5] = ["debug", "info", "warning", "error", "critical"];

    /// Numeric rank of the level (10 for debug up to 50 for critical)
    #[inline]
    pub const fn rank(self) -> i64 {
        self as i64
    }

    /// Canonical lowercase name
    pub const fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    /// Resolve a numeric level to the closest defined level.
    ///
    /// Values outside the scale clamp to `Debug` / `Critical`. Between two
    /// levels the nearer one wins, and an exact tie resolves to the lower.
    ///
    /// ```
    /// use rust_ctxlog::LogLevel;
    ///
    /// assert_eq!(LogLevel::nearest(30), LogLevel::Warning);
    /// assert_eq!(LogLevel::nearest(24), LogLevel::Info);
    /// assert_eq!(LogLevel::nearest(25), LogLevel::Info);
    /// assert_eq!(LogLevel::nearest(-3), LogLevel::Debug);
    /// assert_eq!(LogLevel::nearest(99), LogLevel::Critical);
    /// ```
    pub fn nearest(value: i64) -> Self {
        if value <= LogLevel::Debug.rank() {
            return LogLevel::Debug;
        }
        if value >= LogLevel::Critical.rank() {
            return LogLevel::Critical;
        }

        let mut closest = LogLevel::Debug;
        let mut closest_diff = (value - closest.rank()).abs();
        for level in LogLevel::ALL {
            let diff = (value - level.rank()).abs();
            // strict comparison keeps the lower level on ties
            if diff < closest_diff {
                closest = level;
                closest_diff = diff;
            }
        }
        closest
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Cyan,
            LogLevel::Info => Green,
            LogLevel::Warning => Yellow,
            LogLevel::Error => Red,
            LogLevel::Critical => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            _ => Err(LoggerError::invalid_severity(s, &LogLevel::NAMES)),
        }
    }
}

/// A level given as an enum value, a name or a number.
///
/// Configuration inputs accept all three forms; [`LevelSpec::resolve`]
/// normalizes them to a [`LogLevel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSpec {
    Level(LogLevel),
    Name(String),
    Numeric(i64),
}

impl LevelSpec {
    /// Resolve to a concrete level. Only names can fail.
    pub fn resolve(&self) -> Result<LogLevel> {
        match self {
            LevelSpec::Level(level) => Ok(*level),
            LevelSpec::Name(name) => name.parse(),
            LevelSpec::Numeric(value) => Ok(LogLevel::nearest(*value)),
        }
    }
}

impl From<LogLevel> for LevelSpec {
    fn from(level: LogLevel) -> Self {
        LevelSpec::Level(level)
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        LevelSpec::Name(name.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        LevelSpec::Name(name)
    }
}

impl From<i64> for LevelSpec {
    fn from(value: i64) -> Self {
        LevelSpec::Numeric(value)
    }
}

impl From<i32> for LevelSpec {
    fn from(value: i32) -> Self {
        LevelSpec::Numeric(i64::from(value))
    }
}
