//! File-based logger with size-based rotation.
//!
//! Logs are written to `~/.config/worldclock/logs/worldclock.log`.
//! The terminal belongs to the clock panel, so nothing is ever logged
//! to stdout or stderr. When the file exceeds the configured max size
//! it is rotated to `worldclock.log.1` (one backup kept).

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use serde::{Deserialize, Serialize};

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

const LOG_FILE_NAME: &str = "worldclock.log";
const BACKUP_SUFFIX: &str = ".1";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Parses a level name. Unknown names fall back to `Info`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

struct Logger {
    file: File,
    path: PathBuf,
    min_level: Level,
    max_bytes: u64,
    written: u64,
}

/// Returns the log file path: `~/.config/worldclock/logs/worldclock.log`.
pub fn log_path() -> Option<PathBuf> {
    crate::config::config_dir().map(|d| d.join("logs").join(LOG_FILE_NAME))
}

/// Initialises the global logger. Call once at startup.
///
/// Does nothing if `config.enabled` is `false` or the file can't be opened.
/// Returns `true` when a logger is active afterwards.
pub fn init(config: &LogConfig) -> bool {
    if !config.enabled {
        return false;
    }
    match log_path() {
        Some(path) => init_at(&path, config),
        None => false,
    }
}

/// Initialises the global logger writing to `path`.
pub fn init_at(path: &Path, config: &LogConfig) -> bool {
    if LOGGER.get().is_some() {
        return true;
    }
    let Ok(logger) = Logger::open(path, config) else {
        return false;
    };
    let _ = LOGGER.set(Mutex::new(logger));
    true
}

/// Writes a log line if the level is at or above the configured minimum.
pub fn write(level: Level, args: fmt::Arguments<'_>) {
    let Some(mutex) = LOGGER.get() else {
        return;
    };
    let Ok(mut logger) = mutex.lock() else {
        return;
    };
    logger.write_line(level, args);
}

fn format_line(timestamp: &str, level: Level, args: fmt::Arguments<'_>) -> String {
    format!("{timestamp} [{lvl}] {args}\n", lvl = level.as_str())
}

/// Rotation threshold in bytes for a size in megabytes.
fn max_bytes(max_file_mb: u64) -> u64 {
    max_file_mb.saturating_mul(1024 * 1024)
}

impl Logger {
    fn open(path: &Path, config: &LogConfig) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            min_level: Level::parse(&config.level),
            max_bytes: max_bytes(config.max_file_mb),
            written,
        })
    }

    fn write_line(&mut self, level: Level, args: fmt::Arguments<'_>) {
        if level < self.min_level {
            return;
        }
        let line = format_line(&timestamp(), level, args);

        let _ = self.file.write_all(line.as_bytes());
        self.written = self.written.saturating_add(line.len() as u64);

        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        let backup = backup_path(&self.path);
        let _ = fs::rename(&self.path, &backup);
        if let Ok(f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            self.file = f;
        }
        self.written = 0;
    }
}

/// `worldclock.log` -> `worldclock.log.1`.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        .to_string()
}

/// Logs at DEBUG level.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Debug, format_args!($($arg)*)) };
}

/// Logs at INFO level.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Info, format_args!($($arg)*)) };
}

/// Logs at WARN level.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Warn, format_args!($($arg)*)) };
}

/// Logs at ERROR level.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log::write($crate::log::Level::Error, format_args!($($arg)*)) };
}
