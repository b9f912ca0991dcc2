//! In-memory sink

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Collects written lines in memory.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// destination worker owns the other.
///
/// ```
/// use rust_fanout_logger::writers::MemorySink;
/// use rust_fanout_logger::Sink;
///
/// let sink = MemorySink::new();
/// let mut worker_side = sink.clone();
/// worker_side.write_line("hello").unwrap();
///
/// assert_eq!(sink.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    name: String,
    delay: Option<Duration>,
    fail_writes: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
            name: name.into(),
            delay: None,
            fail_writes: false,
        }
    }

    /// Sleep before every write, to simulate a slow device
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reject every write with an error
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.fail_writes {
            return Err(LoggerError::writer(format!("{} rejected the write", self.name)));
        }
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
