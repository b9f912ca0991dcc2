//! Error types for the fan-out logger

use super::template::TemplateError;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A file-backed destination could not open or create its file
    #[error("Cannot open log file '{path}': {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Deleting the file of a file-backed destination failed
    #[error("Cannot clear log file '{path}': {source}")]
    FileClear {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A message or format template could not be rendered
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Enqueue attempted on a destination whose worker was stopped
    #[error("Destination '{name}' is stopped")]
    DestinationStopped { name: String },

    /// `stop()` called on a destination that was already stopped
    #[error("Destination '{name}' was already stopped")]
    AlreadyStopped { name: String },

    /// The delivery worker panicked and could not be joined cleanly
    #[error("Delivery worker for '{name}' panicked: {message}")]
    WorkerPanicked { name: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    pub fn file_open(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::FileOpen {
            path: path.into(),
            source,
        }
    }

    pub fn file_clear(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::FileClear {
            path: path.into(),
            source,
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            source,
        }
    }

    pub fn stopped(name: impl Into<String>) -> Self {
        LoggerError::DestinationStopped { name: name.into() }
    }

    pub fn already_stopped(name: impl Into<String>) -> Self {
        LoggerError::AlreadyStopped { name: name.into() }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}
