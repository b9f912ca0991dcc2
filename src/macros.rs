//! Logging macros for templated calls.
//!
//! These macros convert each argument into a [`FormatArg`](crate::FormatArg)
//! so a templated call reads like `printf`.
//!
//! # Examples
//!
//! ```
//! use rust_fanout_logger::prelude::*;
//! use rust_fanout_logger::{infof, logf};
//!
//! let router = Router::new();
//!
//! infof!(router, "Server started")?;
//!
//! let port = 8080;
//! infof!(router, "Server listening on port %d", port)?;
//!
//! logf!(router, Severity::Notice, "%s performed %s", "user-42", "login")?;
//! # Ok::<(), LoggerError>(())
//! ```

/// Log a templated message at the given severity.
///
/// # Examples
///
/// ```
/// # use rust_fanout_logger::prelude::*;
/// # let router = Router::new();
/// use rust_fanout_logger::logf;
/// logf!(router, Severity::Info, "Simple message")?;
/// logf!(router, Severity::Error, "Error code: %d", 500)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! logf {
    ($router:expr, $severity:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $router.logf(
            $severity,
            $template,
            &[$($crate::FormatArg::from($arg)),*],
        )
    };
}

/// Log a templated emergency message.
#[macro_export]
macro_rules! emergencyf {
    ($router:expr, $($arg:tt)+) => {
        $crate::logf!($router, $crate::Severity::Emergency, $($arg)+)
    };
}

/// Log a templated alert message.
#[macro_export]
macro_rules! alertf {
    ($router:expr, $($arg:tt)+) => {
        $crate::logf!($router, $crate::Severity::Alert, $($arg)+)
    };
}

/// Log a templated critical message.
#[macro_export]
macro_rules! criticalf {
    ($router:expr, $($arg:tt)+) => {
        $crate::logf!($router, $crate::Severity::Critical, $($arg)+)
    };
}

/// Log a templated error message.
///
/// # Examples
///
/// ```
/// # use rust_fanout_logger::prelude::*;
/// # let router = Router::new();
/// use rust_fanout_logger::errorf;
/// errorf!(router, "Error code: %d, message: %s", 500, "Internal error")?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! errorf {
    ($router:expr, $($arg:tt)+) => {
        $crate::logf!($router, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a templated warning message.
#[macro_export]
macro_rules! warningf {
    ($router:expr, $($arg:tt)+) => {
        $crate::logf!($router, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log a templated notice message.
#[macro_export]
macro_rules! noticef {
    ($router:expr, $($arg:tt)+) => {
        $crate::logf!($router, $crate::Severity::Notice, $($arg)+)
    };
}

/// Log a templated info message.
#[macro_export]
macro_rules! infof {
    ($router:expr, $($arg:tt)+) => {
        $crate::logf!($router, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a templated debug message.
#[macro_export]
macro_rules! debugf {
    ($router:expr, $($arg:tt)+) => {
        $crate::logf!($router, $crate::Severity::Debug, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Destination, Router, Severity};
    use crate::writers::MemorySink;
    use std::time::{Duration, Instant};

    fn router_with_sink() -> (Router, MemorySink) {
        let sink = MemorySink::new();
        let router = Router::builder()
            .destination(Destination::new(sink.clone(), Severity::Debug, "%s %s").unwrap())
            .build();
        (router, sink)
    }

    fn wait_for(sink: &MemorySink, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while sink.len() < count && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_logf_macro() {
        let (router, sink) = router_with_sink();
        logf!(router, Severity::Info, "plain").unwrap();
        logf!(router, Severity::Info, "%s=%d", "count", 5).unwrap();
        logf!(router, Severity::Info, "%s", String::from("owned"),).unwrap();

        wait_for(&sink, 3);
        assert_eq!(sink.lines(), vec!["plain", "count=5", "owned"]);
    }

    #[test]
    fn test_level_macros() {
        let (router, sink) = router_with_sink();
        emergencyf!(router, "%d", 0).unwrap();
        alertf!(router, "%d", 1).unwrap();
        criticalf!(router, "%d", 2).unwrap();
        errorf!(router, "%d", 3).unwrap();
        warningf!(router, "%d", 4).unwrap();
        noticef!(router, "%d", 5).unwrap();
        infof!(router, "%d", 6).unwrap();
        debugf!(router, "%.1f", 7.5).unwrap();

        wait_for(&sink, 8);
        assert_eq!(sink.lines(), vec!["0", "1", "2", "3", "4", "5", "6", "7.5"]);
    }

    #[test]
    fn test_macro_reports_template_errors() {
        let (router, _sink) = router_with_sink();
        assert!(infof!(router, "%d %d", 1).is_err());
    }
}
