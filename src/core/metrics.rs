//! Per-destination delivery metrics
//!
//! Counters for what happened to the messages handed to one destination:
//! queued, written to the sink, failed in the sink, rejected after stop, or
//! discarded from the queue when the worker stopped.

use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery counters for a single destination
///
/// # Example
///
/// ```
/// use rust_fanout_logger::DestinationMetrics;
///
/// let metrics = DestinationMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_written();
///
/// assert_eq!(metrics.written(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct DestinationMetrics {
    /// Messages accepted onto the queue
    enqueued: AtomicU64,

    /// Messages the worker wrote to the sink
    written: AtomicU64,

    /// Messages the sink failed to write (error or panic)
    write_failures: AtomicU64,

    /// Enqueue attempts refused because the destination was stopped
    rejected: AtomicU64,

    /// Messages still queued when the worker stopped
    discarded: AtomicU64,
}

impl DestinationMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::Relaxed)
    }

    /// Messages queued but not yet handled by the worker
    pub fn pending(&self) -> u64 {
        self.enqueued()
            .saturating_sub(self.written())
            .saturating_sub(self.write_failures())
            .saturating_sub(self.discarded())
    }

    /// Record a queued message. Returns the previous count.
    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self, count: u64) -> u64 {
        self.discarded.fetch_add(count, Ordering::Relaxed)
    }

    /// Share of handed-over messages that never reached the sink, as a
    /// percentage (0.0 - 100.0). Returns 0.0 if nothing was handed over.
    pub fn loss_rate(&self) -> f64 {
        let lost = (self.write_failures() + self.rejected() + self.discarded()) as f64;
        let total = (self.enqueued() + self.rejected()) as f64;
        if total == 0.0 {
            0.0
        } else {
            (lost / total) * 100.0
        }
    }
}

impl Default for DestinationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DestinationMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            written: AtomicU64::new(self.written()),
            write_failures: AtomicU64::new(self.write_failures()),
            rejected: AtomicU64::new(self.rejected()),
            discarded: AtomicU64::new(self.discarded()),
        }
    }
}
