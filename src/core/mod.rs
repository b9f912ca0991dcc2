//! Core types: severity, templates, destinations and the router

pub mod destination;
pub mod error;
pub mod metrics;
pub mod router;
pub mod severity;
pub mod sink;
pub mod template;
pub mod timestamp;

pub use destination::{
    Destination, FileOrigin, DEFAULT_FORMAT, DEFAULT_PREFIX, DEFAULT_SEVERITY, DEFAULT_TIMESTAMP,
};
pub use error::{LoggerError, Result};
pub use metrics::DestinationMetrics;
pub use router::{Router, RouterBuilder, FATAL_EXIT_CODE};
pub use severity::Severity;
pub use sink::Sink;
pub use template::{FormatArg, TemplateError};
pub use timestamp::TimestampFormat;
