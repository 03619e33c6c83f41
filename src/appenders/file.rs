//! File appender implementation

use super::rotating_file::{rotate_files, RotationPolicy};
use crate::core::{
    Appender, LevelSpec, LogEntry, LogLevel, LoggerError, OutputFormat, Result, TimestampFormat,
};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one record per line to a file.
///
/// Records are JSON by default. The parent directory is created on demand and
/// every record is flushed as soon as it is written.
///
/// ```no_run
/// use rust_ctxlog::appenders::{FileAppender, RotationPolicy, RotationStrategy};
/// use rust_ctxlog::{LogLevel, OutputFormat};
///
/// let appender = FileAppender::new("/var/log/app/events.log")
///     .unwrap()
///     .with_output_format(OutputFormat::Text)
///     .with_min_level(LogLevel::Warning)
///     .with_rotation(
///         RotationPolicy::new()
///             .with_strategy(RotationStrategy::size_str("20MB").unwrap())
///             .with_max_backups(5)
///             .with_compression(true),
///     );
/// ```
pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    min_level: Option<LogLevel>,
    rotation: Option<RotationPolicy>,
    current_size: u64,
    last_rotation: DateTime<Local>,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size, last_rotation) = open_log_file(&path)?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            output_format: OutputFormat::Json,
            timestamp_format: TimestampFormat::default(),
            min_level: None,
            rotation: None,
            current_size,
            last_rotation,
        })
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_ctxlog::appenders::FileAppender;
    /// use rust_ctxlog::TimestampFormat;
    ///
    /// let appender = FileAppender::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
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

    #[must_use]
    pub fn with_rotation(mut self, policy: RotationPolicy) -> Self {
        self.rotation = Some(policy);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes in the active file, as tracked by this appender
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    pub fn rotation(&self) -> Option<&RotationPolicy> {
        self.rotation.as_ref()
    }

    fn rotate_if_due(&mut self) -> Result<()> {
        let Some(policy) = &self.rotation else {
            return Ok(());
        };
        if !policy
            .strategy
            .is_due(self.current_size, self.last_rotation, Local::now())
        {
            return Ok(());
        }

        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        let rotated = rotate_files(&self.path, policy);
        self.reopen()?;
        self.last_rotation = Local::now();

        if let Err(e) = rotated {
            // keep writing to the active file rather than losing the record
            eprintln!("[WARN] Log rotation failed: {}. Continuing with current file.", e);
            self.current_size = 0;
        }
        Ok(())
    }

    fn reopen(&mut self) -> Result<()> {
        let (file, size, _) = open_log_file(&self.path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| std::io::Error::other("file writer not initialized"))?;
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}

fn open_log_file(path: &Path) -> Result<(File, u64, DateTime<Local>)> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
        })?;

    let metadata = file.metadata().map_err(|e| {
        LoggerError::file_appender(
            path.display().to_string(),
            format!("Cannot access file metadata: {}", e),
        )
    })?;
    let modified = metadata
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now());
    Ok((file, metadata.len(), modified))
}

impl Appender for FileAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.rotate_if_due()?;

        let mut line = self.output_format.format(entry, &self.timestamp_format)?;
        line.push('\n');

        if self.write_line(&line).is_err() {
            // one retry on a fresh handle
            self.reopen()?;
            self.write_line(&line).map_err(|e| {
                LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Failed to write log entry: {}", e),
                )
            })?;
        }
        self.current_size += line.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn min_level(&self) -> Option<LogLevel> {
        self.min_level
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::rotating_file::{backup_path, RotationStrategy};
    use crate::core::FieldValue;
    use chrono::Utc;
    use tempfile::tempdir;

    fn entry(message: &str) -> LogEntry {
        let mut entry = LogEntry::new(LogLevel::Info, Utc::now());
        entry.event = Some("job".into());
        entry.message = Some(message.into());
        entry.fields.insert("n".into(), FieldValue::Int(1));
        entry.timestamp = Some(Utc::now());
        entry
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/app.log");
        let appender = FileAppender::new(&path).unwrap();
        assert!(path.exists());
        assert_eq!(appender.current_size(), 0);
    }

    #[test]
    fn test_json_lines_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut appender = FileAppender::new(&path).unwrap();

        appender.append(&entry("one")).unwrap();
        appender.append(&entry("two")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["message"], "two");
        assert_eq!(parsed["n"], 1);
    }

    #[test]
    fn test_text_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut appender = FileAppender::new(&path)
            .unwrap()
            .with_output_format(OutputFormat::Text);

        appender.append(&entry("hello")).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[INFO] job: hello n=1"));
    }

    #[test]
    fn test_level_override() {
        let dir = tempdir().unwrap();
        let appender = FileAppender::new(dir.path().join("app.log"))
            .unwrap()
            .with_level("error")
            .unwrap();
        assert_eq!(appender.min_level(), Some(LogLevel::Error));
    }

    #[test]
    fn test_size_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut appender = FileAppender::new(&path)
            .unwrap()
            .with_rotation(
                RotationPolicy::new()
                    .with_strategy(RotationStrategy::size(200))
                    .with_max_backups(2),
            );

        for i in 0..20 {
            appender.append(&entry(&format!("record {}", i))).unwrap();
        }

        assert!(backup_path(&path, 1).exists());
        assert!(backup_path(&path, 2).exists());
        assert!(!backup_path(&path, 3).exists());
        assert!(appender.current_size() < 400);

        let active = fs::read_to_string(&path).unwrap();
        assert!(active.contains("record 19"));
    }
}
