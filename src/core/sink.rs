//! Sink trait: the byte-level boundary a destination writes through

use super::error::Result;

/// Something that accepts fully rendered log lines.
///
/// A sink is owned by exactly one destination worker, which is the only
/// thread that ever calls into it, so implementations need `Send` but not
/// `Sync`.
pub trait Sink: Send {
    /// Write one rendered message. The line terminator is the sink's business.
    fn write_line(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
