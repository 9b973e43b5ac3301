//! Log sink for the terminal UI.
//!
//! Writing to stdout/stderr would corrupt the alternate screen, so records go
//! to a bounded in-memory buffer (shown in the log view) and, optionally, to
//! an append-only file.

use super::config::Config;
use super::errors::Result;
use log::{LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Shared ring buffer of formatted log lines.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// Up to `count` most recent lines, oldest first.
    pub fn recent(&self, count: usize) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().skip(lines.len().saturating_sub(count)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct SessionLogger {
    level: LevelFilter,
    buffer: LogBuffer,
    file: Option<Mutex<File>>,
}

impl SessionLogger {
    pub fn new(level: LevelFilter, buffer: LogBuffer, file: Option<File>) -> Self {
        Self { level, buffer, file: file.map(Mutex::new) }
    }
}

impl Log for SessionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("{:<5} {}: {}", record.level(), record.target(), record.args());
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{line}");
            }
        }
        self.buffer.push(line);
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Installs the global logger and returns the buffer it fills.
pub fn install(config: &Config) -> Result<LogBuffer> {
    let buffer = LogBuffer::new(config.log_capacity);
    let file = match &config.log_file {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };
    let level = config.level_filter();
    log::set_boxed_logger(Box::new(SessionLogger::new(level, buffer.clone(), file)))?;
    log::set_max_level(level);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_buffer_drops_oldest() {
        let buffer = LogBuffer::new(2);
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        buffer.push("c".to_string());
        assert_eq!(buffer.recent(10), vec!["b", "c"]);
        assert_eq!(buffer.recent(1), vec!["c"]);
    }

    #[test]
    fn test_logger_respects_level() {
        let buffer = LogBuffer::new(10);
        let logger = SessionLogger::new(LevelFilter::Info, buffer.clone(), None);
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("leadsheet")
                .args(format_args!("hidden"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("leadsheet")
                .args(format_args!("shown"))
                .build(),
        );
        assert_eq!(buffer.recent(10), vec!["WARN  leadsheet: shown"]);
    }

    #[test]
    fn test_logger_appends_to_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let logger = SessionLogger::new(
            LevelFilter::Info,
            LogBuffer::new(4),
            Some(file.reopen().unwrap()),
        );
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("leadsheet")
                .args(format_args!("loaded 3 records"))
                .build(),
        );
        logger.flush();
        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "INFO  leadsheet: loaded 3 records\n");
    }
}
