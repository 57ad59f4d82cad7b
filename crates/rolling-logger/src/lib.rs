//! Rolling Logger
//!
//! `log` backend for the dashboard. Every record is formatted once, kept in
//! a circular buffer of recent lines, and forwarded to a caller-supplied
//! sink (the browser console).

mod buffer;

use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record};

pub use buffer::LogBuffer;

/// Lines kept in memory
pub const BUFFER_CAPACITY: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
}

type Sink = Box<dyn Fn(Level, &str) + Send + Sync>;

pub struct RollingLogger {
    app_name: String,
    level: LevelFilter,
    buffer: Mutex<LogBuffer>,
    sink: Sink,
}

static LOGGER: OnceLock<&'static RollingLogger> = OnceLock::new();

impl RollingLogger {
    fn new(app_name: &str, level: LevelFilter, sink: Sink) -> Self {
        Self {
            app_name: app_name.to_string(),
            level,
            buffer: Mutex::new(LogBuffer::new(BUFFER_CAPACITY)),
            sink,
        }
    }

    fn format(&self, level: Level, target: &str, message: &str) -> String {
        format!(
            "[{}] [{}] {:<5} {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            self.app_name,
            level,
            target,
            message
        )
    }

    fn write(&self, level: Level, line: String) {
        (self.sink)(level, &line);
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(line);
    }

    pub fn recent(&self) -> Vec<String> {
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .lines()
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record.level(), record.target(), &record.args().to_string());
        self.write(record.level(), line);
    }

    fn flush(&self) {}
}

fn install(logger: RollingLogger) -> Result<(), LoggerError> {
    let level = logger.level;
    let logger: &'static RollingLogger = Box::leak(Box::new(logger));
    LOGGER
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    log::set_logger(logger).map_err(|_| LoggerError::AlreadyInitialized)?;
    log::set_max_level(level);
    Ok(())
}

/// Log to `sink` (e.g. the browser console) at `level` and above
pub fn init_with_sink<F>(app_name: &str, level: LevelFilter, sink: F) -> Result<(), LoggerError>
where
    F: Fn(Level, &str) + Send + Sync + 'static,
{
    install(RollingLogger::new(app_name, level, Box::new(sink)))
}

/// Most recent lines, oldest first
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|l| l.recent()).unwrap_or_default()
}
