//! Router configuration loading and validation
//!
//! A router can be described in JSON and built in one step:
//!
//! ```
//! use rust_fanout_logger::{Router, RouterConfig};
//!
//! let config = RouterConfig::from_json_str(r#"{
//!     "destinations": [
//!         { "target": { "kind": "stdout" }, "threshold": "debug" },
//!         { "target": { "kind": "stderr" }, "threshold": "warning", "format": "%s: %s" }
//!     ]
//! }"#)?;
//!
//! let router = Router::from_config(&config)?;
//! assert_eq!(router.len(), 2);
//! # Ok::<(), rust_fanout_logger::LoggerError>(())
//! ```

use crate::core::{
    Destination, LoggerError, Result, Router, Severity, TimestampFormat, DEFAULT_FORMAT,
    DEFAULT_PREFIX, DEFAULT_SEVERITY, DEFAULT_TIMESTAMP,
};
use crate::writers::LineWriter;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Where a destination writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Target {
    Stdout,
    Stderr,
    File {
        path: PathBuf,
        /// Truncate the file before the destination starts
        #[serde(default)]
        clear: bool,
    },
    Tcp {
        address: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub target: Target,

    #[serde(default = "default_threshold", deserialize_with = "deserialize_severity")]
    pub threshold: Severity,

    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_timestamp")]
    pub timestamp: TimestampFormat,
}

impl DestinationConfig {
    /// Config for `target` with every other field at its default
    pub fn new(target: Target) -> Self {
        Self {
            target,
            threshold: DEFAULT_SEVERITY,
            format: DEFAULT_FORMAT.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            timestamp: DEFAULT_TIMESTAMP,
        }
    }

    /// Open the writer and start the destination described by this config
    pub fn build(&self) -> Result<Destination> {
        let timestamp = self.timestamp.clone();
        match &self.target {
            Target::Stdout => Destination::new(
                LineWriter::stdout()
                    .with_prefix(self.prefix.clone())
                    .with_timestamp(timestamp),
                self.threshold,
                self.format.clone(),
            ),
            Target::Stderr => Destination::new(
                LineWriter::stderr()
                    .with_prefix(self.prefix.clone())
                    .with_timestamp(timestamp),
                self.threshold,
                self.format.clone(),
            ),
            Target::File { path, clear } => {
                if *clear {
                    remove_if_present(path)?;
                }
                Destination::file_with(
                    path,
                    self.threshold,
                    self.format.clone(),
                    self.prefix.clone(),
                    timestamp,
                )
            }
            #[cfg(feature = "network")]
            Target::Tcp { address } => Destination::new(
                LineWriter::tcp(address.clone())?
                    .with_prefix(self.prefix.clone())
                    .with_timestamp(timestamp),
                self.threshold,
                self.format.clone(),
            ),
            #[cfg(not(feature = "network"))]
            Target::Tcp { .. } => Err(LoggerError::config(
                "tcp destination",
                "built without the `network` feature",
            )),
        }
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LoggerError::file_clear(path.display().to_string(), e)),
    }
}

fn default_threshold() -> Severity {
    DEFAULT_SEVERITY
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_timestamp() -> TimestampFormat {
    DEFAULT_TIMESTAMP
}

/// Accepts any spelling `Severity::from_str` accepts ("warn", "CRIT", ...)
fn deserialize_severity<'de, D>(deserializer: D) -> std::result::Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default)]
    pub destinations: Vec<DestinationConfig>,
}

impl RouterConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: RouterConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(format!("reading config {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Check values that deserialization alone cannot reject
    pub fn validate(&self) -> Result<()> {
        for (index, destination) in self.destinations.iter().enumerate() {
            let component = format!("destinations[{}]", index);
            match &destination.target {
                Target::File { path, .. } if path.as_os_str().is_empty() => {
                    return Err(LoggerError::config(component, "file path is empty"));
                }
                Target::Tcp { address } if address.trim().is_empty() => {
                    return Err(LoggerError::config(component, "tcp address is empty"));
                }
                _ => {}
            }
            destination
                .timestamp
                .validate()
                .map_err(|message| LoggerError::config(component, message))?;
        }
        Ok(())
    }
}

impl Router {
    /// Build a router with one destination per config entry, in order.
    ///
    /// Destinations are started as they are built; if one fails, the ones
    /// already started are stopped when the partial router is dropped.
    pub fn from_config(config: &RouterConfig) -> Result<Router> {
        config.validate()?;
        let mut router = Router::new();
        for destination in &config.destinations {
            router.add_destination(destination.build()?);
        }
        Ok(router)
    }
}
