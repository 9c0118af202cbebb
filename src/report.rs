// src/report.rs

//! Shared log sink trait and implementations
//!
//! Every update run reports its outcome through an ordered stream of
//! (level, message) records. The sink is the only channel by which the
//! background task talks to the caller; no error ever crosses the async
//! boundary directly.
//!
//! Implementations:
//! - `ConsoleSink`: prints records for interactive CLI use
//! - `TracingSink`: forwards records to the tracing subscriber
//! - `MemorySink`: collects records in memory for assertions in tests

use std::fmt;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Severity of a report record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Ordered sink for run-scoped report records
///
/// Implementations must be thread-safe: records are posted from the
/// background task while the caller blocks on the completion drain.
pub trait LogSink: Send + Sync {
    /// Post one record
    fn record(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.record(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, message);
    }
}

/// Console sink for interactive use
///
/// Info records go to stdout; warnings and errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for ConsoleSink {
    fn record(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => println!("{}", message),
            LogLevel::Warning => eprintln!("warning: {}", message),
            LogLevel::Error => eprintln!("error: {}", message),
        }
    }
}

/// Sink that forwards records to the tracing subscriber
///
/// Useful for non-interactive environments where the run report should land
/// in logs alongside everything else.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn record(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => info!("{}", message),
            LogLevel::Warning => warn!("{}", message),
            LogLevel::Error => error!("{}", message),
        }
    }
}

/// In-memory sink collecting records in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records posted so far
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().unwrap().clone()
    }

    /// Messages recorded at the given level
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn record(&self, level: LogLevel, message: &str) {
        self.records
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}
