//! Router: fans one logging call out to every admitting destination

use super::{
    destination::Destination,
    error::{LoggerError, Result},
    severity::Severity,
    template::{self, FormatArg},
    timestamp::TimestampFormat,
};
use std::io::{self, Write};

/// Exit status used by [`Router::fatal`]
pub const FATAL_EXIT_CODE: i32 = 1;

/// Ordered set of destinations.
///
/// Logging calls run on the caller's thread and do no I/O: for each
/// destination whose threshold admits the severity, the message is rendered
/// and handed to that destination's queue. Destinations are visited in
/// registration order.
///
/// `add_destination` and `clear_file_destination` take `&mut self`; they are
/// setup operations and cannot run concurrently with logging through a shared
/// reference.
///
/// # Example
///
/// ```
/// use rust_fanout_logger::prelude::*;
/// use rust_fanout_logger::writers::MemorySink;
///
/// let console = MemorySink::named("console");
/// let audit = MemorySink::named("audit");
///
/// let router = Router::builder()
///     .destination(Destination::new(console.clone(), Severity::Debug, DEFAULT_FORMAT)?)
///     .destination(Destination::new(audit.clone(), Severity::Warning, "%s|%s")?)
///     .build();
///
/// router.info("service started")?;
/// router.warningf("disk %d%% full", &[93.into()])?;
/// router.stop_all()?;
/// # Ok::<(), LoggerError>(())
/// ```
#[derive(Debug, Default)]
pub struct Router {
    destinations: Vec<Destination>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self {
            destinations: Vec::new(),
        }
    }

    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub fn add_destination(&mut self, destination: Destination) {
        self.destinations.push(destination);
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination(&self, index: usize) -> Option<&Destination> {
        self.destinations.get(index)
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Deliver `message` at `severity` to every admitting destination, each
    /// wrapped in that destination's own format.
    ///
    /// Stopped destinations are skipped. A destination whose format cannot be
    /// rendered gets nothing; the others still receive the message and the
    /// first rendering error is returned.
    pub fn log(&self, severity: Severity, message: impl AsRef<str>) -> Result<()> {
        let message = message.as_ref();
        let mut first_error: Option<LoggerError> = None;

        for destination in &self.destinations {
            if destination.is_stopped() || !destination.admits(severity) {
                continue;
            }
            match destination.render(severity, message) {
                // A stop racing with this call makes enqueue fail; the
                // destination counts the rejection.
                Ok(line) => {
                    let _ = destination.enqueue(line);
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Deliver a caller-formatted message to every admitting destination.
    ///
    /// The destinations' own formats are not applied. The template is
    /// rendered once, and only if some destination admits `severity`; if it
    /// fails to render nothing is delivered.
    pub fn logf(&self, severity: Severity, template: &str, args: &[FormatArg]) -> Result<()> {
        let mut rendered: Option<String> = None;

        for destination in &self.destinations {
            if destination.is_stopped() || !destination.admits(severity) {
                continue;
            }
            if rendered.is_none() {
                rendered = Some(template::render(template, args)?);
            }
            if let Some(line) = &rendered {
                let _ = destination.enqueue(line.clone());
            }
        }

        Ok(())
    }

    #[inline]
    pub fn emergency(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Severity::Emergency, message)
    }

    #[inline]
    pub fn alert(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Severity::Alert, message)
    }

    #[inline]
    pub fn critical(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Severity::Critical, message)
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Severity::Error, message)
    }

    #[inline]
    pub fn warning(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Severity::Warning, message)
    }

    #[inline]
    pub fn notice(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Severity::Notice, message)
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Severity::Info, message)
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) -> Result<()> {
        self.log(Severity::Debug, message)
    }

    #[inline]
    pub fn emergencyf(&self, template: &str, args: &[FormatArg]) -> Result<()> {
        self.logf(Severity::Emergency, template, args)
    }

    #[inline]
    pub fn alertf(&self, template: &str, args: &[FormatArg]) -> Result<()> {
        self.logf(Severity::Alert, template, args)
    }

    #[inline]
    pub fn criticalf(&self, template: &str, args: &[FormatArg]) -> Result<()> {
        self.logf(Severity::Critical, template, args)
    }

    #[inline]
    pub fn errorf(&self, template: &str, args: &[FormatArg]) -> Result<()> {
        self.logf(Severity::Error, template, args)
    }

    #[inline]
    pub fn warningf(&self, template: &str, args: &[FormatArg]) -> Result<()> {
        self.logf(Severity::Warning, template, args)
    }

    #[inline]
    pub fn noticef(&self, template: &str, args: &[FormatArg]) -> Result<()> {
        self.logf(Severity::Notice, template, args)
    }

    #[inline]
    pub fn infof(&self, template: &str, args: &[FormatArg]) -> Result<()> {
        self.logf(Severity::Info, template, args)
    }

    #[inline]
    pub fn debugf(&self, template: &str, args: &[FormatArg]) -> Result<()> {
        self.logf(Severity::Debug, template, args)
    }

    /// Write `message` straight to stderr and exit the process with
    /// [`FATAL_EXIT_CODE`]. No destination sees it.
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        write_direct(&mut io::stderr().lock(), message.as_ref());
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Templated [`fatal`](Self::fatal). A template that fails to render is
    /// written verbatim with the error appended; the process exits regardless.
    pub fn fatalf(&self, template: &str, args: &[FormatArg]) -> ! {
        self.fatal(render_or_mark(template, args))
    }

    /// Write `message` straight to stderr, then panic with it. No destination
    /// sees it.
    pub fn abort(&self, message: impl AsRef<str>) -> ! {
        let message = message.as_ref();
        write_direct(&mut io::stderr().lock(), message);
        panic!("{}", message)
    }

    /// Templated [`abort`](Self::abort)
    pub fn abortf(&self, template: &str, args: &[FormatArg]) -> ! {
        self.abort(render_or_mark(template, args))
    }

    /// Truncate the backing file of the file destination at `index`.
    ///
    /// The file is deleted, a fresh destination with the same threshold,
    /// format, prefix and timestamp layout takes the old one's place, and the
    /// old one is stopped. On failure the router is unchanged.
    pub fn clear_file_destination(&mut self, index: usize) -> Result<()> {
        let existing = self.destinations.get(index).ok_or_else(|| {
            LoggerError::config("router", format!("no destination at index {}", index))
        })?;
        let path = existing
            .path()
            .ok_or_else(|| {
                LoggerError::config(
                    "router",
                    format!("destination '{}' is not file-backed", existing.name()),
                )
            })?
            .to_path_buf();

        let fresh = Destination::clear_file(&path, existing)?;
        let old = std::mem::replace(&mut self.destinations[index], fresh);
        match old.stop() {
            Ok(()) | Err(LoggerError::AlreadyStopped { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Stop every destination that is still running.
    ///
    /// All destinations are stopped even if one fails; the first error is
    /// returned.
    pub fn stop_all(&self) -> Result<()> {
        let mut first_error: Option<LoggerError> = None;
        for destination in &self.destinations {
            if destination.is_stopped() {
                continue;
            }
            if let Err(e) = destination.stop() {
                eprintln!("[LOGGER ERROR] Failed to stop destination '{}': {}", destination.name(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Write one timestamped line, bypassing every destination
fn write_direct(out: &mut dyn Write, message: &str) {
    let line = match TimestampFormat::Standard.now() {
        Some(stamp) => format!("{} {}\n", stamp, message),
        None => format!("{}\n", message),
    };
    let _ = out.write_all(line.as_bytes());
    let _ = out.flush();
}

fn render_or_mark(template: &str, args: &[FormatArg]) -> String {
    match template::render(template, args) {
        Ok(message) => message,
        Err(e) => format!("{} [template error: {}]", template, e),
    }
}

/// Builder for constructing a Router with a fluent API
///
/// # Example
/// ```
/// use rust_fanout_logger::prelude::*;
///
/// let router = Router::builder()
///     .destination(Destination::stdout(Severity::Info, DEFAULT_FORMAT)?)
///     .build();
/// assert_eq!(router.len(), 1);
/// # Ok::<(), LoggerError>(())
/// ```
#[derive(Debug, Default)]
pub struct RouterBuilder {
    destinations: Vec<Destination>,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            destinations: Vec::new(),
        }
    }

    /// Add a destination; delivery order follows call order
    #[must_use = "builder methods return a new value"]
    pub fn destination(mut self, destination: Destination) -> Self {
        self.destinations.push(destination);
        self
    }

    pub fn build(self) -> Router {
        Router {
            destinations: self.destinations,
        }
    }
}
