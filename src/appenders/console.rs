//! Console appender implementation

use crate::core::{
    Appender, LevelSpec, LogEntry, LogLevel, LoggerError, OutputFormat, Result, TimestampFormat,
};
use colored::Colorize;
use std::io::Write;

/// Writes records to stdout, optionally sending warnings and above to stderr.
///
/// Text output is colored by level unless colors are disabled or the output
/// format is JSON.
pub struct ConsoleAppender {
    use_colors: bool,
    use_stderr: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
    min_level: Option<LogLevel>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            use_stderr: false,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
            min_level: None,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use rust_ctxlog::appenders::ConsoleAppender;
    /// use rust_ctxlog::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Route warning, error and critical records to stderr
    #[must_use]
    pub fn with_stderr(mut self, use_stderr: bool) -> Self {
        self.use_stderr = use_stderr;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_ctxlog::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_custom_timestamp("%d/%b/%Y:%H:%M:%S %z");
    /// ```
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    pub fn with_level(self, level: impl Into<LevelSpec>) -> Result<Self> {
        Ok(self.with_min_level(level.into().resolve()?))
    }

    /// Render `entry` exactly as it would be printed, without the newline
    pub fn render(&self, entry: &LogEntry) -> Result<String> {
        let output = self.output_format.format(entry, &self.timestamp_format)?;
        if !self.use_colors || self.output_format == OutputFormat::Json {
            return Ok(output);
        }

        let colored = output.color(entry.level.color_code());
        let colored = if entry.level == LogLevel::Critical {
            colored.bold()
        } else {
            colored
        };
        Ok(colored.to_string())
    }

    fn goes_to_stderr(&self, level: LogLevel) -> bool {
        self.use_stderr && level >= LogLevel::Warning
    }
}

fn write_record<W: Write>(out: &mut W, stream: &str, record: &str) -> Result<()> {
    out.write_all(record.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| LoggerError::writer(format!("Failed to write to {}: {}", stream, e)))
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut output = self.render(entry)?;
        output.push('\n');

        // one locked write per record keeps concurrent records whole
        if self.goes_to_stderr(entry.level) {
            write_record(&mut std::io::stderr().lock(), "stderr", &output)
        } else {
            write_record(&mut std::io::stdout().lock(), "stdout", &output)
        }
    }

    fn flush(&mut self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn min_level(&self) -> Option<LogLevel> {
        self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(level: LogLevel) -> LogEntry {
        let mut entry = LogEntry::new(level, Utc::now());
        entry.event = Some("boot".into());
        entry.message = Some("ready".into());
        entry.timestamp = Some(Utc::now());
        entry
    }

    #[test]
    fn test_plain_render() {
        let appender = ConsoleAppender::with_colors(false);
        let output = appender.render(&entry(LogLevel::Info)).unwrap();
        assert!(output.ends_with("[INFO] boot: ready"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_colored_render() {
        colored::control::set_override(true);
        let appender = ConsoleAppender::new();
        let output = appender.render(&entry(LogLevel::Error)).unwrap();
        assert!(output.contains('\u{1b}'));
        assert!(output.contains("[ERROR] boot: ready"));
    }

    #[test]
    fn test_json_is_never_colored() {
        let appender = ConsoleAppender::new().with_output_format(OutputFormat::Json);
        let output = appender.render(&entry(LogLevel::Warning)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["level"], "warning");
    }

    #[test]
    fn test_stderr_routing() {
        let appender = ConsoleAppender::new().with_stderr(true);
        assert!(!appender.goes_to_stderr(LogLevel::Info));
        assert!(appender.goes_to_stderr(LogLevel::Warning));
        assert!(appender.goes_to_stderr(LogLevel::Critical));
        assert!(!ConsoleAppender::new().goes_to_stderr(LogLevel::Critical));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_record() {
        let mut buffer = Vec::new();
        write_record(&mut buffer, "stdout", "one line\n").unwrap();
        assert_eq!(buffer, b"one line\n");

        let err = write_record(&mut ClosedPipe, "stderr", "lost\n").unwrap_err();
        match err {
            LoggerError::WriterError(msg) => {
                assert!(msg.starts_with("Failed to write to stderr"));
                assert!(msg.contains("closed"));
            }
            other => panic!("expected writer error, got {:?}", other),
        }
    }

    #[test]
    fn test_append_and_flush() {
        let mut appender = ConsoleAppender::with_colors(false).with_min_level(LogLevel::Debug);
        assert_eq!(appender.min_level(), Some(LogLevel::Debug));
        appender.append(&entry(LogLevel::Debug)).unwrap();
        appender.flush().unwrap();
    }
}
