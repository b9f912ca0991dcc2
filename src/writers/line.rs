//! Line-oriented writer over any `io::Write`

use crate::core::{LoggerError, Result, Sink, TimestampFormat, DEFAULT_PREFIX, DEFAULT_TIMESTAMP};
use std::io::{self, Stderr, Stdout, Write};

/// Writes `<prefix> <timestamp> <message>\n` lines to an underlying writer.
///
/// The space after the prefix is only written when the prefix is non-empty.
///
/// Embedded `\n` and `\r` in a message are escaped by default so that one
/// log call always produces exactly one line.
///
/// # Example
///
/// ```
/// use rust_fanout_logger::writers::LineWriter;
/// use rust_fanout_logger::{Sink, TimestampFormat};
///
/// let mut writer = LineWriter::new(Vec::new(), "buffer")
///     .with_prefix("app:")
///     .with_timestamp(TimestampFormat::None);
/// writer.write_line("INFO       ready").unwrap();
///
/// assert_eq!(writer.get_ref().as_slice(), b"app: INFO       ready\n");
/// ```
pub struct LineWriter<W: Write + Send> {
    writer: W,
    name: String,
    prefix: String,
    timestamp: TimestampFormat,
    escape_newlines: bool,
}

impl<W: Write + Send> LineWriter<W> {
    pub fn new(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer,
            name: name.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            timestamp: DEFAULT_TIMESTAMP,
            escape_newlines: true,
        }
    }

    /// Text written at the start of every line, followed by one space
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: TimestampFormat) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Keep embedded line breaks as they are
    #[must_use]
    pub fn with_escaping(mut self, escape_newlines: bool) -> Self {
        self.escape_newlines = escape_newlines;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn timestamp(&self) -> &TimestampFormat {
        &self.timestamp
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn compose(&self, message: &str) -> String {
        let mut line = String::with_capacity(self.prefix.len() + message.len() + 32);
        if !self.prefix.is_empty() {
            line.push_str(&self.prefix);
            line.push(' ');
        }
        if let Some(stamp) = self.timestamp.now() {
            line.push_str(&stamp);
            line.push(' ');
        }
        if self.escape_newlines {
            for c in message.chars() {
                match c {
                    '\n' => line.push_str("\\n"),
                    '\r' => line.push_str("\\r"),
                    _ => line.push(c),
                }
            }
        } else {
            line.push_str(message);
        }
        line.push('\n');
        line
    }
}

impl LineWriter<Stdout> {
    pub fn stdout() -> Self {
        LineWriter::new(io::stdout(), "stdout")
    }
}

impl LineWriter<Stderr> {
    pub fn stderr() -> Self {
        LineWriter::new(io::stderr(), "stderr")
    }
}

impl<W: Write + Send> Sink for LineWriter<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let composed = self.compose(line);
        self.writer
            .write_all(composed.as_bytes())
            .map_err(|e| LoggerError::io_operation(format!("writing to {}", self.name), e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
