//! Stress tests for concurrent delivery and shutdown
//!
//! These tests verify:
//! - No message is lost or duplicated when many threads log at once
//! - A slow destination never holds up the caller or its siblings
//! - Stop racing with enqueue neither deadlocks nor loses accounting
//! - Thread safety of runtime reconfiguration

use rust_fanout_logger::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// Every message from every thread arrives exactly once
#[test]
fn test_concurrent_logging_no_loss() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 500;

    let sink = MemorySink::new();
    let router = Arc::new(
        Router::builder()
            .destination(Destination::new(sink.clone(), Severity::Debug, "%.0s%s").unwrap())
            .build(),
    );

    let mut handles = vec![];
    for t in 0..THREADS {
        let router = Arc::clone(&router);
        handles.push(thread::spawn(move || {
            for i in 0..PER_THREAD {
                router.info(format!("{}:{}", t, i)).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(wait_until(|| sink.len() == THREADS * PER_THREAD));
    router.stop_all().unwrap();

    let lines = sink.lines();
    let unique: HashSet<&String> = lines.iter().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD, "duplicate lines delivered");

    // Each producer's own messages stay in order
    for t in 0..THREADS {
        let prefix = format!("{}:", t);
        let seq: Vec<usize> = lines
            .iter()
            .filter_map(|l| l.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(seq, (0..PER_THREAD).collect::<Vec<_>>());
    }

    let metrics = router.destination(0).unwrap().metrics();
    assert_eq!(metrics.written(), (THREADS * PER_THREAD) as u64);
    assert_eq!(metrics.loss_rate(), 0.0);
}

/// A sink that takes 50ms per line does not slow down logging calls
#[test]
fn test_slow_destination_does_not_block_caller() {
    let slow = MemorySink::named("slow").with_delay(Duration::from_millis(50));
    let fast = MemorySink::named("fast");

    let router = Router::builder()
        .destination(Destination::new(slow.clone(), Severity::Info, "%.0s%s").unwrap())
        .destination(Destination::new(fast.clone(), Severity::Info, "%.0s%s").unwrap())
        .build();

    let start = Instant::now();
    for i in 0..40 {
        router.info(format!("line {}", i)).unwrap();
    }
    let elapsed = start.elapsed();

    // 40 writes at 50ms would take 2s if the caller waited
    assert!(elapsed < Duration::from_millis(500), "logging took {:?}", elapsed);

    assert!(wait_until(|| fast.len() == 40));
    assert!(slow.len() < 40, "slow sink should still be behind");

    router.stop_all().unwrap();
}

/// Stopping discards the backlog instead of waiting for it
#[test]
fn test_stop_with_backlog_returns_promptly() {
    let slow = MemorySink::named("slow").with_delay(Duration::from_millis(20));
    let destination = Destination::new(slow.clone(), Severity::Debug, "%.0s%s").unwrap();

    for i in 0..200 {
        destination.enqueue(format!("queued {}", i)).unwrap();
    }

    let start = Instant::now();
    destination.stop().unwrap();
    assert!(start.elapsed() < Duration::from_secs(1), "stop waited for the backlog");

    let metrics = destination.metrics();
    assert_eq!(metrics.enqueued(), 200);
    assert_eq!(
        metrics.written() + metrics.discarded(),
        200,
        "every queued message is either written or discarded"
    );
    assert_eq!(slow.len() as u64, metrics.written());
}

/// Producers hammer a destination while another thread stops it
#[test]
fn test_stop_racing_with_enqueue() {
    for _ in 0..20 {
        let sink = MemorySink::new();
        let destination =
            Arc::new(Destination::new(sink.clone(), Severity::Debug, "%.0s%s").unwrap());

        let mut producers = vec![];
        for t in 0..4 {
            let destination = Arc::clone(&destination);
            producers.push(thread::spawn(move || {
                let mut accepted = 0u64;
                for i in 0..250 {
                    match destination.enqueue(format!("{}-{}", t, i)) {
                        Ok(()) => accepted += 1,
                        Err(LoggerError::DestinationStopped { .. }) => {}
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
                accepted
            }));
        }

        let stopper = {
            let destination = Arc::clone(&destination);
            thread::spawn(move || {
                thread::sleep(Duration::from_micros(200));
                destination.stop()
            })
        };

        let accepted: u64 = producers.into_iter().map(|h| h.join().unwrap()).sum();
        stopper.join().unwrap().unwrap();

        let metrics = destination.metrics();
        assert_eq!(metrics.enqueued(), accepted);
        assert_eq!(metrics.enqueued() + metrics.rejected(), 1000);
        assert_eq!(
            metrics.written() + metrics.write_failures() + metrics.discarded(),
            metrics.enqueued()
        );
        assert_eq!(sink.len() as u64, metrics.written());
    }
}

/// Only one of several concurrent stop calls wins
#[test]
fn test_concurrent_double_stop() {
    let destination = Arc::new(Destination::with_defaults(MemorySink::new()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let destination = Arc::clone(&destination);
            thread::spawn(move || destination.stop())
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let already = results
        .iter()
        .filter(|r| matches!(r, Err(LoggerError::AlreadyStopped { .. })))
        .count();

    assert_eq!(ok, 1);
    assert_eq!(already, 7);
    assert!(destination.is_stopped());
}

/// Threshold and format changes while logging are safe
#[test]
fn test_reconfigure_while_logging() {
    let sink = MemorySink::new();
    let router = Arc::new(
        Router::builder()
            .destination(Destination::new(sink.clone(), Severity::Debug, "%s %s").unwrap())
            .build(),
    );

    let logger = {
        let router = Arc::clone(&router);
        thread::spawn(move || {
            for i in 0..1000 {
                router.notice(format!("{}", i)).unwrap();
            }
        })
    };

    let reconfigure = {
        let router = Arc::clone(&router);
        thread::spawn(move || {
            let destination = router.destination(0).unwrap();
            for i in 0..200 {
                if i % 2 == 0 {
                    destination.set_format("[%s] %s");
                    destination.set_threshold(Severity::Error);
                } else {
                    destination.set_format("%s %s");
                    destination.set_threshold(Severity::Debug);
                }
            }
        })
    };

    logger.join().unwrap();
    reconfigure.join().unwrap();

    let destination = router.destination(0).unwrap();
    assert!(wait_until(|| destination.metrics().pending() == 0));
    router.stop_all().unwrap();

    for line in sink.lines() {
        assert!(
            line.starts_with("NOTICE ") || line.starts_with("[NOTICE] "),
            "unexpected line {:?}",
            line
        );
    }
}
