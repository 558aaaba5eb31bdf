//! Structured logging for the survey toolkit.
//!
//! Tags each entry with the component that produced it and an optional
//! subject (a station id, a product file name), with UTC timestamps.
//! Writes to the console and, optionally, appends to a log file.

use chrono::Utc;
use serde::Deserialize;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::download::FetchError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    GpsTime,
    Products,
    Fetch,
    Stations,
    Ranking,
    Config,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::GpsTime => write!(f, "GPS"),
            Component::Products => write!(f, "PROD"),
            Component::Fetch => write!(f, "FETCH"),
            Component::Stations => write!(f, "STN"),
            Component::Ranking => write!(f, "RANK"),
            Component::Config => write!(f, "CFG"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - product not yet published for the requested day
    Expected,
    /// Unexpected failure - archive down, timeouts, server errors
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    fn format_entry(level: LogLevel, component: Component, subject: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, component, subject_part, message)
    }

    fn log(&self, level: LogLevel, component: Component, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let entry = Self::format_entry(level, component, subject, message);
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, subject_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, subject_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", component, subject_part, message),
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger. Calling it again replaces the previous one.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    let logger = Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
    };
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(logger);
    }
}

fn dispatch(level: LogLevel, component: Component, subject: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, component, subject, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, subject, message);
}

/// Log a warning message
pub fn warn(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, subject, message);
}

/// Log an error message
pub fn error(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, subject, message);
}

/// Log a debug message
pub fn debug(component: Component, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, subject, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an archive fetch failure.
///
/// A missing file is normal for recent dates: final orbits appear ~2 weeks
/// late, rapids ~17 hours late.
pub fn classify_fetch_failure(err: &FetchError) -> FailureType {
    match err {
        FetchError::NotFound(_) => FailureType::Expected,
        FetchError::Transport(msg) => {
            if msg.contains("HTTP 5") || msg.contains("timed out") {
                FailureType::Unexpected
            } else {
                FailureType::Unknown
            }
        }
    }
}

/// Log a fetch failure at the level its classification warrants
pub fn log_fetch_failure(file_name: &str, err: &FetchError) {
    let failure_type = classify_fetch_failure(err);
    let message = format!("download failed [{}]: {}", failure_type, err);

    match failure_type {
        FailureType::Expected => warn(Component::Fetch, Some(file_name), &message),
        FailureType::Unexpected => error(Component::Fetch, Some(file_name), &message),
        FailureType::Unknown => warn(Component::Fetch, Some(file_name), &message),
    }
}

// ---------------------------------------------------------------------------
// Download Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a download run
pub fn log_download_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Download complete: {}/{} successful, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(Component::Fetch, None, &message);
    } else if successful == 0 {
        error(Component::Fetch, None, &message);
    } else {
        warn(Component::Fetch, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_failure_classification() {
        let missing = FetchError::NotFound("https://archive/igr21906.sp3.Z".to_string());
        assert_eq!(classify_fetch_failure(&missing), FailureType::Expected);

        let server = FetchError::Transport("HTTP 503 for https://archive".to_string());
        assert_eq!(classify_fetch_failure(&server), FailureType::Unexpected);

        let timeout = FetchError::Transport("request timed out: https://archive".to_string());
        assert_eq!(classify_fetch_failure(&timeout), FailureType::Unexpected);

        let refused = FetchError::Transport("request failed: connection refused".to_string());
        assert_eq!(classify_fetch_failure(&refused), FailureType::Unknown);
    }

    #[test]
    fn test_entry_format_includes_component_and_subject() {
        let entry = Logger::format_entry(LogLevel::Warning, Component::Fetch, Some("igr21906.sp3.Z"), "missing");
        assert!(entry.ends_with("WARN FETCH [igr21906.sp3.Z]: missing"), "got '{}'", entry);
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.log");
        let logger = Logger {
            min_level: LogLevel::Info,
            log_file: Some(path.to_string_lossy().into_owned()),
            console_timestamps: true,
        };
        logger.log(LogLevel::Debug, Component::System, None, "dropped");
        logger.log(LogLevel::Info, Component::System, None, "first");
        logger.log(LogLevel::Error, Component::Ranking, Some("BOGA"), "second");

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO SYS: first"));
        assert!(lines[1].ends_with("ERROR RANK [BOGA]: second"));
    }
}
