//! Sink implementations
//!
//! [`LineWriter`] turns any `io::Write` into a [`Sink`](crate::core::Sink)
//! that prefixes and timestamps each line: console streams and files are
//! built on it, and so is the TCP writer when the `network` feature is on.
//! [`MemorySink`] keeps lines in memory.

pub mod file;
pub mod line;
pub mod memory;
#[cfg(feature = "network")]
pub mod network;

pub use file::{open_append, FileWriter};
pub use line::LineWriter;
pub use memory::MemorySink;
#[cfg(feature = "network")]
pub use network::{ReconnectingStream, TcpWriter};

// Re-export the trait for convenience
pub use crate::core::Sink;
