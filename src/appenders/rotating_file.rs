//! Log file rotation
//!
//! A [`RotationPolicy`] decides when the active file is rotated and how many
//! backups survive. Backups are numbered from newest to oldest:
//! `app.log` moves to `app.1.log`, the previous `app.1.log` to `app.2.log`,
//! and so on. With compression enabled each fresh backup is gzipped to
//! `app.1.log.gz`.

use crate::core::error::{LoggerError, Result};
use chrono::{DateTime, Local, NaiveTime, TimeZone};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// When to rotate the active log file
///
/// # Examples
///
/// ```
/// use rust_ctxlog::appenders::RotationStrategy;
///
/// let by_size: RotationStrategy = RotationStrategy::size_str("20MB").unwrap();
/// assert_eq!(by_size, RotationStrategy::Size { max_bytes: 20 * 1024 * 1024 });
///
/// let nightly = RotationStrategy::daily_at("00.00").unwrap();
/// assert_eq!(nightly, RotationStrategy::Daily { hour: 0, minute: 0 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStrategy {
    /// Rotate once the file reaches `max_bytes`
    Size { max_bytes: u64 },

    /// Rotate once a day at the given local time
    Daily { hour: u32, minute: u32 },

    /// No rotation (useful when external rotation is used)
    Never,
}

impl Default for RotationStrategy {
    fn default() -> Self {
        RotationStrategy::Size {
            max_bytes: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl RotationStrategy {
    #[must_use]
    pub fn size(max_bytes: u64) -> Self {
        RotationStrategy::Size { max_bytes }
    }

    /// Size strategy from a human-readable size such as `"500KB"` or `"1.5GB"`
    pub fn size_str(size: &str) -> Result<Self> {
        Ok(RotationStrategy::Size {
            max_bytes: parse_size(size)?,
        })
    }

    pub fn daily(hour: u32, minute: u32) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(LoggerError::config(
                "RotationStrategy",
                format!("time of day out of range: {:02}.{:02}", hour, minute),
            ));
        }
        Ok(RotationStrategy::Daily { hour, minute })
    }

    /// Daily strategy from `"HH.MM"` (a `:` separator is accepted too)
    pub fn daily_at(time: &str) -> Result<Self> {
        let invalid = || {
            LoggerError::config(
                "RotationStrategy",
                format!("expected time of day as HH.MM, got '{}'", time),
            )
        };

        let (hour, minute) = time
            .trim()
            .split_once(['.', ':'])
            .ok_or_else(invalid)?;
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        let minute = minute.parse::<u32>().map_err(|_| invalid())?;
        Self::daily(hour, minute)
    }

    /// Whether a file of `current_size` bytes, last rotated at
    /// `last_rotation`, is due for rotation at `now`
    pub fn is_due(
        &self,
        current_size: u64,
        last_rotation: DateTime<Local>,
        now: DateTime<Local>,
    ) -> bool {
        match *self {
            RotationStrategy::Never => false,
            RotationStrategy::Size { max_bytes } => current_size >= max_bytes,
            RotationStrategy::Daily { hour, minute } => {
                match latest_boundary(now, hour, minute) {
                    Some(boundary) => last_rotation < boundary,
                    None => false,
                }
            }
        }
    }
}

/// Most recent occurrence of `hour:minute` at or before `now`
fn latest_boundary(now: DateTime<Local>, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let today = now.date_naive().and_time(time);
    let boundary = if now.naive_local() >= today {
        today
    } else {
        today - chrono::Duration::days(1)
    };
    Local.from_local_datetime(&boundary).earliest()
}

/// Parse a size such as `"20MB"`, `"512kb"`, `"1.5GB"` or `"1048576"`
///
/// ```
/// use rust_ctxlog::appenders::parse_size;
///
/// assert_eq!(parse_size("2KB").unwrap(), 2048);
/// assert_eq!(parse_size("1.5mb").unwrap(), 1_572_864);
/// assert!(parse_size("lots").is_err());
/// ```
pub fn parse_size(size: &str) -> Result<u64> {
    let lower = size.trim().to_ascii_lowercase();
    let (number, multiplier) = if let Some(n) = lower.strip_suffix("kb") {
        (n, 1024.0)
    } else if let Some(n) = lower.strip_suffix("mb") {
        (n, 1024.0 * 1024.0)
    } else if let Some(n) = lower.strip_suffix("gb") {
        (n, 1024.0 * 1024.0 * 1024.0)
    } else {
        (lower.as_str(), 1.0)
    };

    let value: f64 = number.trim().parse().map_err(|_| {
        LoggerError::config("RotationStrategy", format!("invalid size '{}'", size))
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(LoggerError::config(
            "RotationStrategy",
            format!("size must be positive, got '{}'", size),
        ));
    }
    Ok((value * multiplier) as u64)
}

/// Configuration for rotating log files
///
/// # Examples
///
/// ```
/// use rust_ctxlog::appenders::{RotationPolicy, RotationStrategy};
///
/// let policy = RotationPolicy::new()
///     .with_strategy(RotationStrategy::size(50 * 1024 * 1024))
///     .with_max_backups(7)
///     .with_compression(true);
/// assert_eq!(policy.max_backup_files, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotation strategy defining when to rotate
    pub strategy: RotationStrategy,
    /// Maximum number of rotated files to keep
    pub max_backup_files: usize,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::default(),
            max_backup_files: 5,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_strategy(mut self, strategy: RotationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Path of backup number `index` for `base`: `logs/app.log` -> `logs/app.3.log`
pub fn backup_path(base: &Path, index: usize) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("app");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}.{}", stem, index, ext),
        None => format!("{}.{}", stem, index),
    };
    base.with_file_name(name)
}

fn compressed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Shift the backups of `base` and move `base` itself to backup 1.
///
/// The caller must have closed its handle on `base`. The oldest backup beyond
/// `max_backup_files` is deleted; with zero backups the active file is simply
/// removed.
pub fn rotate_files(base: &Path, policy: &RotationPolicy) -> Result<()> {
    let keep = policy.max_backup_files;
    if keep == 0 {
        if base.exists() {
            fs::remove_file(base).map_err(|e| {
                LoggerError::file_rotation(
                    base.display().to_string(),
                    format!("Failed to truncate log file: {}", e),
                )
            })?;
        }
        return Ok(());
    }

    let oldest = backup_path(base, keep);
    for candidate in [compressed_path(&oldest), oldest] {
        if candidate.exists() {
            if let Err(e) = fs::remove_file(&candidate) {
                eprintln!(
                    "[WARN] Failed to remove oldest backup {}: {}",
                    candidate.display(),
                    e
                );
            }
        }
    }

    for i in (1..keep).rev() {
        let old_path = backup_path(base, i);
        let new_path = backup_path(base, i + 1);
        for (from, to) in [
            (compressed_path(&old_path), compressed_path(&new_path)),
            (old_path, new_path),
        ] {
            if from.exists() {
                fs::rename(&from, &to).map_err(|e| {
                    LoggerError::file_rotation(
                        from.display().to_string(),
                        format!("Failed to rotate backup files: {}", e),
                    )
                })?;
            }
        }
    }

    if base.exists() {
        let first = backup_path(base, 1);
        fs::rename(base, &first).map_err(|e| {
            LoggerError::file_rotation(
                base.display().to_string(),
                format!("Failed to rotate current log file: {}", e),
            )
        })?;

        if policy.compress {
            compress_file(&first)?;
        }
    }

    Ok(())
}

/// Gzip `path` into `path.gz` using streaming I/O.
///
/// The original is removed only after the compressed file is complete.
pub fn compress_file(path: &Path) -> Result<()> {
    let gz_path = compressed_path(path);
    let mut temp_name = gz_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(temp_name);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let streamed = stream(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut writer| writer.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

fn stream<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> std::io::Result<()> {
    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            return Ok(());
        }
        writer.write_all(&buffer[..bytes_read])?;
    }
}
