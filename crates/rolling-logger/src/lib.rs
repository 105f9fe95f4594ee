//! Rolling Logger
//!
//! A `tracing` layer that keeps the most recent log lines in a circular
//! buffer and echoes each line to the browser console (stderr off the web).
//! `log` records from dependencies are bridged into the same pipeline.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Lines kept by the installed logger
pub const DEFAULT_CAPACITY: usize = 256;

static INSTALLED: OnceLock<LogBuffer> = OnceLock::new();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoggerError {
    #[error("unknown log level `{0}`")]
    InvalidLevel(String),
    #[error("a global logger is already installed")]
    AlreadyInitialized,
    #[error("logger has not been initialized")]
    NotInitialized,
}

// ========================
// Log lines
// ========================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub at: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:<5} {}: {}",
            self.at.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Circular buffer of log lines, shared between the layer and readers
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, line: LogLine) {
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<LogLine> {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

// ========================
// Layer
// ========================

/// Collects the message and fields of an event into one line
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<String>,
    log_target: Option<String>,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "log.target" => self.log_target = Some(value.to_string()),
            name if name.starts_with("log.") => {}
            name => self.fields.push(format!("{}={}", name, value)),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            name if name.starts_with("log.") => {}
            name => self.fields.push(format!("{}={:?}", name, value)),
        }
    }
}

pub struct RollingLayer {
    buffer: LogBuffer,
    echo: bool,
}

impl RollingLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer, echo: true }
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let mut message = visitor.message;
        if !visitor.fields.is_empty() {
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(&visitor.fields.join(" "));
        }

        let line = LogLine {
            at: Utc::now(),
            level: *metadata.level(),
            target: visitor.log_target.unwrap_or_else(|| metadata.target().to_string()),
            message,
        };
        if self.echo {
            emit(&line);
        }
        self.buffer.push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(line: &LogLine) {
    let text = line.to_string().into();
    if line.level == Level::ERROR {
        web_sys::console::error_1(&text);
    } else if line.level == Level::WARN {
        web_sys::console::warn_1(&text);
    } else if line.level == Level::INFO {
        web_sys::console::log_1(&text);
    } else {
        web_sys::console::debug_1(&text);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(line: &LogLine) {
    eprintln!("{}", line);
}

// ========================
// Global logger
// ========================

/// Install the global subscriber with a ring buffer of `DEFAULT_CAPACITY` lines
pub fn init_logger(app_name: &str, level: &str) -> Result<LogBuffer, LoggerError> {
    let filter: LevelFilter = level
        .trim()
        .parse()
        .map_err(|_| LoggerError::InvalidLevel(level.to_string()))?;
    let buffer = LogBuffer::default();

    tracing_subscriber::registry()
        .with(filter)
        .with(RollingLayer::new(buffer.clone()))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;
    let _ = INSTALLED.set(buffer.clone());

    tracing::info!(app = app_name, level = %filter, "logger initialized");
    Ok(buffer)
}

fn installed() -> Result<&'static LogBuffer, LoggerError> {
    INSTALLED.get().ok_or(LoggerError::NotInitialized)
}

/// Most recent lines of the installed logger, oldest first
pub fn recent() -> Vec<LogLine> {
    installed().map(LogBuffer::snapshot).unwrap_or_default()
}

pub fn info(message: &str) -> Result<(), LoggerError> {
    installed()?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), LoggerError> {
    installed()?;
    tracing::error!("{}", message);
    Ok(())
}
