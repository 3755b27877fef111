//! Logging collaborator for key operations
//!
//! Failures are reported with the operation name, a timestamp and the
//! configured account index, then returned unchanged to the caller.
//! Nothing secret (mnemonics, companion codes, seeds, private keys) is ever
//! passed to a logger.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::KeyError;

/// Log target used by [`FacadeLogger`].
pub const LOG_TARGET: &str = "platarium";

/// Non-secret metadata attached to a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub operation: &'static str,
    pub timestamp: DateTime<Utc>,
    pub index: u32,
}

impl ErrorContext {
    pub fn now(operation: &'static str, index: u32) -> Self {
        Self {
            operation,
            timestamp: Utc::now(),
            index,
        }
    }
}

/// Sink for key-operation diagnostics. Implementations must not panic.
pub trait KeyLogger: Send + Sync {
    fn log_error(&self, context: &ErrorContext, error: &KeyError);
    fn log_info(&self, operation: &str, message: &str, index: u32);
}

/// Forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeLogger;

impl KeyLogger for FacadeLogger {
    fn log_error(&self, context: &ErrorContext, error: &KeyError) {
        log::error!(
            target: LOG_TARGET,
            "{} failed [{}] at {} (index {}): {}",
            context.operation,
            error.kind(),
            context.timestamp.to_rfc3339(),
            context.index,
            error
        );
    }

    fn log_info(&self, operation: &str, message: &str, index: u32) {
        log::info!(target: LOG_TARGET, "{}: {} (index {})", operation, message, index);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub operation: String,
    pub message: String,
    pub index: u32,
}

/// Keeps entries in memory; useful for asserting on diagnostics.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }
}

impl KeyLogger for MemoryLogger {
    fn log_error(&self, context: &ErrorContext, error: &KeyError) {
        self.push(LogEntry {
            level: LogLevel::Error,
            operation: context.operation.to_string(),
            message: format!("[{}] {}", error.kind(), error),
            index: context.index,
        });
    }

    fn log_info(&self, operation: &str, message: &str, index: u32) {
        self.push(LogEntry {
            level: LogLevel::Info,
            operation: operation.to_string(),
            message: message.to_string(),
            index,
        });
    }
}
