use crate::domain::logging::{LogEntry, LogLevel, Logger, TimeProvider, get_time_provider};
use chrono::{DateTime, Local, Utc};
use gloo::console;

/// Browser console sink for domain logging
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    pub fn new_production() -> Self {
        Self::new(LogLevel::Info)
    }

    pub fn new_development() -> Self {
        Self::new(LogLevel::Debug)
    }

    pub fn format_entry(entry: &LogEntry, timestamp: &str) -> String {
        let fields = entry.fields_line();
        if fields.is_empty() {
            format!("[{}] {} {} | {}", timestamp, entry.level, entry.component, entry.message)
        } else {
            format!(
                "[{}] {} {} | {} | {}",
                timestamp, entry.level, entry.component, entry.message, fields
            )
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        let timestamp = get_time_provider().format_timestamp(entry.timestamp);
        let line = Self::format_entry(&entry, &timestamp);
        match entry.level {
            LogLevel::Trace | LogLevel::Debug => console::debug!(line),
            LogLevel::Info => console::info!(line),
            LogLevel::Warn => console::warn!(line),
            LogLevel::Error => console::error!(line),
        }
    }
}

/// Wall clock backed by chrono; local time for display
#[derive(Debug, Default, Clone, Copy)]
pub struct ChronoTimeProvider;

impl ChronoTimeProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl TimeProvider for ChronoTimeProvider {
    fn current_timestamp(&self) -> u64 {
        Self::now_millis().max(0) as u64
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        DateTime::<Utc>::from_timestamp_millis(timestamp as i64)
            .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S%.3f").to_string())
            .unwrap_or_else(|| format!("{:06}", timestamp))
    }
}
