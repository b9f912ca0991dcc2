//! TCP writer for remote log collection

use super::line::LineWriter;
use crate::core::Result;
use std::io::{self, Write};
use std::net::TcpStream;
use std::time::Duration;

const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Line writer over a TCP connection
pub type TcpWriter = LineWriter<ReconnectingStream>;

/// TCP stream that reconnects once when a write fails
///
/// # Example
///
/// ```no_run
/// use rust_fanout_logger::prelude::*;
/// use rust_fanout_logger::writers::TcpWriter;
///
/// let writer = TcpWriter::tcp("127.0.0.1:5140").expect("log server reachable");
/// let destination = Destination::new(writer, Severity::Warning, DEFAULT_FORMAT);
/// ```
pub struct ReconnectingStream {
    stream: Option<TcpStream>,
    address: String,
    reconnect_on_error: bool,
}

impl ReconnectingStream {
    pub fn connect(address: impl Into<String>) -> io::Result<Self> {
        let address = address.into();
        let stream = Self::open(&address)?;
        Ok(Self {
            stream: Some(stream),
            address,
            reconnect_on_error: true,
        })
    }

    /// Enable or disable the reconnect attempt (enabled by default)
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn open(address: &str) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(address)?;
        stream.set_write_timeout(Some(WRITE_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    fn not_connected() -> io::Error {
        io::Error::new(io::ErrorKind::NotConnected, "log stream not connected")
    }
}

impl Write for ReconnectingStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = match self.stream.as_mut() {
            Some(stream) => stream.write(buf),
            None => Err(Self::not_connected()),
        };

        match result {
            Ok(n) => Ok(n),
            Err(e) => {
                self.stream = None;
                if !self.reconnect_on_error {
                    return Err(e);
                }
                let mut stream = Self::open(&self.address).map_err(|reconnect_err| {
                    io::Error::new(
                        e.kind(),
                        format!("{} (reconnect to {} failed: {})", e, self.address, reconnect_err),
                    )
                })?;
                let n = stream.write(buf)?;
                self.stream = Some(stream);
                Ok(n)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream.as_mut() {
            Some(stream) => stream.flush(),
            None => Ok(()),
        }
    }
}

impl LineWriter<ReconnectingStream> {
    pub fn tcp(address: impl Into<String>) -> Result<Self> {
        let stream = ReconnectingStream::connect(address)?;
        let name = format!("tcp:{}", stream.address());
        Ok(LineWriter::new(stream, name))
    }
}
