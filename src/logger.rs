//! diagnostics gathered while deciding one turn, shipped to the engine inside the order
use crate::orders::{LogLevel, PlayerOrder};
use tracing::debug;

/// Buffer of diagnostic lines for a single policy invocation. Lines are also
/// mirrored to `tracing` so they show up on stderr when running locally.
#[derive(Debug, Default)]
pub struct Logger {
    lines: Vec<(String, LogLevel)>,
}

impl Logger {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Logger::default()
    }

    #[allow(missing_docs)]
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message.into(), LogLevel::Info);
    }

    #[allow(missing_docs)]
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message.into(), LogLevel::Error);
    }

    fn push(&mut self, message: String, level: LogLevel) {
        debug!(log_level = %level, "{}", message);
        self.lines.push((message, level));
    }

    /// lines buffered so far, oldest first
    pub fn lines(&self) -> &[(String, LogLevel)] {
        &self.lines
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Wraps `order` in one `LoggingOrder` per buffered line. The oldest line
    /// ends up innermost, the most recent one is the outermost wrapper.
    pub fn into_order(self, order: PlayerOrder) -> PlayerOrder {
        self.lines
            .into_iter()
            .fold(order, |inner, (message, level)| inner.logged(message, level))
    }
}
