//! Destination: one sink with its own filter, format and delivery worker
//!
//! Every destination owns a dedicated worker thread and an unbounded FIFO
//! queue. Callers only ever hand rendered strings to the queue; the worker is
//! the only thread that touches the sink, so writes to one sink are serialized
//! and appear in enqueue order.
//!
//! # Stop policy
//!
//! `stop()` flips the `stopped` flag exactly once, signals the worker and
//! joins it. The flag sits behind a read/write lock that `enqueue()` holds
//! across its send, so every accepted message is already queued when the
//! worker sees the stop signal. The worker finishes the write it is in the middle of, then exits
//! without draining the queue; whatever was still queued is counted as
//! discarded. After the flag is set, `enqueue()` returns
//! [`LoggerError::DestinationStopped`] and the message is dropped and counted
//! as rejected. An enqueue racing with `stop()` either lands in the queue and
//! is discarded, or is rejected; it never waits on the sink. A second
//! `stop()` returns [`LoggerError::AlreadyStopped`].

use super::{
    error::{LoggerError, Result},
    metrics::DestinationMetrics,
    severity::Severity,
    sink::Sink,
    template::{self, FormatArg},
    timestamp::TimestampFormat,
};
use crate::writers::{FileWriter, LineWriter};
use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender, TryRecvError};
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default two-slot template: severity name left-aligned in 10 columns, then
/// the message.
pub const DEFAULT_FORMAT: &str = "%-10s %s";

/// Default threshold for new destinations
pub const DEFAULT_SEVERITY: Severity = Severity::Info;

/// Default line prefix for writers
pub const DEFAULT_PREFIX: &str = "";

/// Default timestamp layout for writers
pub const DEFAULT_TIMESTAMP: TimestampFormat = TimestampFormat::Standard;

#[derive(Debug, Clone)]
struct Settings {
    threshold: Severity,
    format: String,
}

/// How a file-backed destination was opened, so it can be recreated
#[derive(Debug, Clone, PartialEq)]
pub struct FileOrigin {
    pub path: PathBuf,
    pub prefix: String,
    pub timestamp: TimestampFormat,
}

enum WorkerEvent {
    Message(String),
    Stop,
    /// Every sender is gone
    Closed,
}

pub struct Destination {
    name: String,
    settings: RwLock<Settings>,
    sender: Sender<String>,
    stop_tx: Sender<()>,
    stopped: RwLock<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    metrics: Arc<DestinationMetrics>,
    file: Option<FileOrigin>,
}

impl Destination {
    /// Create a destination over `sink` and spawn its worker.
    ///
    /// `format` is not checked here; a malformed template is reported when a
    /// message is rendered with it.
    ///
    /// # Errors
    ///
    /// Fails only if the worker thread cannot be spawned.
    pub fn new<S: Sink + 'static>(
        sink: S,
        threshold: Severity,
        format: impl Into<String>,
    ) -> Result<Self> {
        let name = sink.name().to_string();
        let (sender, receiver) = unbounded::<String>();
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let metrics = Arc::new(DestinationMetrics::new());
        let metrics_clone = Arc::clone(&metrics);

        let handle = thread::Builder::new()
            .name(format!("fanout-{}", name))
            .spawn(move || Self::run(Box::new(sink), receiver, stop_rx, metrics_clone))
            .map_err(|e| LoggerError::io_operation(format!("spawning worker for {}", name), e))?;

        Ok(Self {
            name,
            settings: RwLock::new(Settings {
                threshold,
                format: format.into(),
            }),
            sender,
            stop_tx,
            stopped: RwLock::new(false),
            worker: Mutex::new(Some(handle)),
            metrics,
            file: None,
        })
    }

    /// Destination with the default threshold and format
    pub fn with_defaults<S: Sink + 'static>(sink: S) -> Result<Self> {
        Self::new(sink, DEFAULT_SEVERITY, DEFAULT_FORMAT)
    }

    /// Destination writing to standard output
    pub fn stdout(threshold: Severity, format: impl Into<String>) -> Result<Self> {
        Self::new(LineWriter::stdout(), threshold, format)
    }

    /// Destination writing to standard error
    pub fn stderr(threshold: Severity, format: impl Into<String>) -> Result<Self> {
        Self::new(LineWriter::stderr(), threshold, format)
    }

    /// Destination appending to the file at `path`, created if missing.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileOpen`] if the file cannot be opened; no
    /// worker is started in that case.
    pub fn file(
        path: impl AsRef<Path>,
        threshold: Severity,
        format: impl Into<String>,
    ) -> Result<Self> {
        Self::file_with(
            path,
            threshold,
            format,
            DEFAULT_PREFIX,
            DEFAULT_TIMESTAMP,
        )
    }

    /// File destination with an explicit line prefix and timestamp layout
    pub fn file_with(
        path: impl AsRef<Path>,
        threshold: Severity,
        format: impl Into<String>,
        prefix: impl Into<String>,
        timestamp: TimestampFormat,
    ) -> Result<Self> {
        let path = path.as_ref();
        let prefix = prefix.into();
        let writer = FileWriter::file(path)?
            .with_prefix(prefix.clone())
            .with_timestamp(timestamp.clone());

        let mut destination = Self::new(writer, threshold, format)?;
        destination.file = Some(FileOrigin {
            path: path.to_path_buf(),
            prefix,
            timestamp,
        });
        Ok(destination)
    }

    /// Delete the file at `path` and open a fresh file destination with the
    /// threshold and format of `existing`.
    ///
    /// This is not atomic: the file is removed first, then recreated. The
    /// caller decides what to do with `existing` (usually stop it).
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileClear`] if the file cannot be removed, in
    /// which case nothing is created and `existing` is untouched.
    pub fn clear_file(path: impl AsRef<Path>, existing: &Destination) -> Result<Self> {
        let path = path.as_ref();
        std::fs::remove_file(path)
            .map_err(|e| LoggerError::file_clear(path.display().to_string(), e))?;

        let (prefix, timestamp) = match &existing.file {
            Some(origin) => (origin.prefix.clone(), origin.timestamp.clone()),
            None => (DEFAULT_PREFIX.to_string(), DEFAULT_TIMESTAMP),
        };
        Self::file_with(
            path,
            existing.threshold(),
            existing.format(),
            prefix,
            timestamp,
        )
    }

    /// Worker loop: write messages until stopped or until every sender is gone.
    fn run(
        mut sink: Box<dyn Sink>,
        messages: Receiver<String>,
        stop: Receiver<()>,
        metrics: Arc<DestinationMetrics>,
    ) {
        loop {
            let event = select! {
                recv(messages) -> message => message.map_or(WorkerEvent::Closed, WorkerEvent::Message),
                recv(stop) -> _ => WorkerEvent::Stop,
            };

            match event {
                WorkerEvent::Message(line) => {
                    // A stop that raced with this message wins
                    if !matches!(stop.try_recv(), Err(TryRecvError::Empty)) {
                        metrics.record_discarded(1 + messages.len() as u64);
                        break;
                    }
                    Self::deliver(sink.as_mut(), &line, &metrics);
                    if messages.is_empty() {
                        Self::flush_sink(sink.as_mut());
                    }
                }
                WorkerEvent::Stop => {
                    let left = messages.len() as u64;
                    if left > 0 {
                        metrics.record_discarded(left);
                    }
                    break;
                }
                WorkerEvent::Closed => break,
            }
        }

        Self::flush_sink(sink.as_mut());
    }

    /// Write one line with panic isolation; failures are reported, never
    /// propagated, since nobody is waiting on the result.
    fn deliver(sink: &mut dyn Sink, line: &str, metrics: &DestinationMetrics) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.write_line(line)));

        match result {
            Ok(Ok(())) => {
                metrics.record_written();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Destination '{}' write failed: {}", sink.name(), e);
                metrics.record_write_failure();
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Destination '{}' panicked while writing: {}. \
                     The worker keeps running.",
                    sink.name(),
                    panic_message(&*panic_info)
                );
                metrics.record_write_failure();
            }
        }
    }

    fn flush_sink(sink: &mut dyn Sink) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Destination '{}' flush failed: {}", sink.name(), e);
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Destination '{}' panicked while flushing: {}. \
                     The worker keeps running.",
                    sink.name(),
                    panic_message(&*panic_info)
                );
            }
        }
    }

    /// Hand a rendered message to the worker.
    ///
    /// Never waits on the sink. See the module docs for the stop policy.
    pub fn enqueue(&self, message: impl Into<String>) -> Result<()> {
        let stopped = self.stopped.read();
        if *stopped {
            self.metrics.record_rejected();
            return Err(LoggerError::stopped(&self.name));
        }

        match self.sender.send(message.into()) {
            Ok(()) => {
                self.metrics.record_enqueued();
                Ok(())
            }
            Err(_) => {
                self.metrics.record_rejected();
                Err(LoggerError::stopped(&self.name))
            }
        }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// # Errors
    ///
    /// [`LoggerError::AlreadyStopped`] on a second call;
    /// [`LoggerError::WorkerPanicked`] if the worker thread died.
    pub fn stop(&self) -> Result<()> {
        {
            let mut stopped = self.stopped.write();
            if *stopped {
                return Err(LoggerError::already_stopped(&self.name));
            }
            *stopped = true;
        }

        // Capacity 1 and a single send: never blocks
        let _ = self.stop_tx.try_send(());

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if let Err(panic_info) = handle.join() {
                return Err(LoggerError::WorkerPanicked {
                    name: self.name.clone(),
                    message: format!("{:?}", panic_info),
                });
            }
        }
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.read()
    }

    /// Whether a message at `severity` passes this destination's threshold
    pub fn admits(&self, severity: Severity) -> bool {
        self.settings.read().threshold.admits(severity)
    }

    /// Apply this destination's format to a severity and message.
    ///
    /// The severity is rendered in uppercase, as in `"WARNING"`.
    pub fn render(&self, severity: Severity, message: &str) -> Result<String> {
        let settings = self.settings.read();
        let args = [
            FormatArg::Str(severity.to_str().to_string()),
            FormatArg::Str(message.to_string()),
        ];
        Ok(template::render(&settings.format, &args)?)
    }

    pub fn set_format(&self, format: impl Into<String>) {
        self.settings.write().format = format.into();
    }

    pub fn set_threshold(&self, threshold: Severity) {
        self.settings.write().threshold = threshold;
    }

    pub fn format(&self) -> String {
        self.settings.read().format.clone()
    }

    pub fn threshold(&self) -> Severity {
        self.settings.read().threshold
    }

    /// Name of the underlying sink, e.g. `"stdout"` or `"file:/var/log/app.log"`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing file for file destinations
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|origin| origin.path.as_path())
    }

    pub fn file_origin(&self) -> Option<&FileOrigin> {
        self.file.as_ref()
    }

    pub fn metrics(&self) -> &DestinationMetrics {
        &self.metrics
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.settings.read();
        f.debug_struct("Destination")
            .field("name", &self.name)
            .field("threshold", &settings.threshold)
            .field("format", &settings.format)
            .field("stopped", &self.is_stopped())
            .field("file", &self.file)
            .finish()
    }
}

impl Drop for Destination {
    fn drop(&mut self) {
        if self.is_stopped() {
            return;
        }
        if let Err(e) = self.stop() {
            eprintln!("[LOGGER ERROR] Failed to stop destination on drop: {}", e);
        }
        let discarded = self.metrics.discarded();
        if discarded > 0 {
            eprintln!(
                "[LOGGER WARNING] Destination '{}' dropped with {} undelivered messages",
                self.name, discarded
            );
        }
    }
}
