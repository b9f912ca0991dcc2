//! # Rust Fan-out Logger
//!
//! One logging call, many destinations. Each destination (console, file,
//! TCP, or anything implementing [`Sink`]) has its own severity threshold,
//! its own message format and its own delivery worker, so a slow sink never
//! holds up the caller or the other destinations.
//!
//! ## Features
//!
//! - **Eight syslog severities**: `Emergency` down to `Debug`
//! - **Per-destination FIFO delivery**: one worker thread and one unbounded
//!   queue per destination
//! - **Two formatting paths**: `log` wraps the destination's template around
//!   a message, `logf` lets the caller format the whole line
//! - **Graceful stop**: every worker is joined; nothing leaks
//! - **JSON configuration** for building a router at startup

pub mod config;
pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::config::{DestinationConfig, RouterConfig, Target};
    pub use crate::core::{
        Destination, DestinationMetrics, FormatArg, LoggerError, Result, Router, RouterBuilder,
        Severity, Sink, TemplateError, TimestampFormat, DEFAULT_FORMAT, DEFAULT_PREFIX,
        DEFAULT_SEVERITY, DEFAULT_TIMESTAMP,
    };
    pub use crate::writers::{LineWriter, MemorySink};
}

pub use config::{DestinationConfig, RouterConfig, Target};
pub use core::{
    Destination, DestinationMetrics, FileOrigin, FormatArg, LoggerError, Result, Router,
    RouterBuilder, Severity, Sink, TemplateError, TimestampFormat, DEFAULT_FORMAT, DEFAULT_PREFIX,
    DEFAULT_SEVERITY, DEFAULT_TIMESTAMP, FATAL_EXIT_CODE,
};
