//! Rolling Logger
//!
//! A `tracing-subscriber` layer that keeps the last N formatted events in a
//! circular buffer and mirrors each line to a sink (stderr natively, the
//! browser console in the editor).

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("log capacity must be positive")]
    ZeroCapacity,
}

/// Receives every formatted line as it is recorded
pub type Sink = Box<dyn Fn(Level, &str) + Send + Sync>;

// ============================================================================
// Buffer
// ============================================================================

/// Shared handle to the most recent log lines
#[derive(Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn recent(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

// ============================================================================
// Layer
// ============================================================================

pub struct RingLayer {
    buffer: LogBuffer,
    sink: Option<Sink>,
}

impl RingLayer {
    pub fn new(buffer: LogBuffer, sink: Option<Sink>) -> Self {
        Self { buffer, sink }
    }
}

/// Collects the `message` field plus `key=value` pairs for the rest
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

fn format_line(level: &Level, target: &str, visitor: &LineVisitor) -> String {
    format!(
        "{} {:>5} {}: {}{}",
        chrono::Local::now().format("%H:%M:%S%.3f"),
        level,
        target,
        visitor.message,
        visitor.fields
    )
}

impl<S: Subscriber> Layer<S> for RingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let line = format_line(metadata.level(), metadata.target(), &visitor);
        if let Some(sink) = &self.sink {
            sink(*metadata.level(), &line);
        }
        self.buffer.push(line);
    }
}

// ============================================================================
// Global init
// ============================================================================

static GLOBAL: OnceLock<LogBuffer> = OnceLock::new();

/// Install the ring-buffer layer as the global subscriber
pub fn init_logger(capacity: usize, sink: Option<Sink>) -> Result<LogBuffer, LoggerError> {
    if capacity == 0 {
        return Err(LoggerError::ZeroCapacity);
    }
    if GLOBAL.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let buffer = LogBuffer::new(capacity);
    tracing_subscriber::registry()
        .with(RingLayer::new(buffer.clone(), sink))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    let _ = GLOBAL.set(buffer.clone());
    tracing::info!(capacity, "logger initialized");
    Ok(buffer)
}

/// Buffer of the installed logger, if any
pub fn global_buffer() -> Option<LogBuffer> {
    GLOBAL.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture<F: FnOnce()>(capacity: usize, f: F) -> Vec<String> {
        let buffer = LogBuffer::new(capacity);
        let subscriber = tracing_subscriber::registry().with(RingLayer::new(buffer.clone(), None));
        tracing::subscriber::with_default(subscriber, f);
        buffer.recent()
    }

    #[test]
    fn test_lines_carry_level_message_and_fields() {
        let lines = capture(10, || tracing::warn!(guild_id = "42", "load failed"));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" WARN "));
        assert!(lines[0].contains("load failed guild_id=42"));
    }

    #[test]
    fn test_oldest_lines_roll_off() {
        let lines = capture(3, || {
            for i in 0..5 {
                tracing::info!("line {i}");
            }
        });
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("line 2"));
        assert!(lines[2].ends_with("line 4"));
    }

    #[test]
    fn test_sink_sees_every_line() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sink: Sink = Box::new(move |level, _line| sink_seen.lock().unwrap().push(level));

        let buffer = LogBuffer::new(1);
        let subscriber = tracing_subscriber::registry().with(RingLayer::new(buffer, Some(sink)));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("a");
            tracing::error!("b");
        });

        assert_eq!(*seen.lock().unwrap(), vec![Level::DEBUG, Level::ERROR]);
    }

    #[test]
    fn test_second_init_is_rejected() {
        assert!(matches!(init_logger(0, None), Err(LoggerError::ZeroCapacity)));
        let buffer = init_logger(8, None).unwrap();
        assert!(matches!(init_logger(8, None), Err(LoggerError::AlreadyInitialized)));
        assert!(buffer.recent().iter().any(|l| l.contains("logger initialized")));
        assert!(global_buffer().is_some());
    }
}
