//! Criterion benchmarks for rust_fanout_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_fanout_logger::prelude::*;
use rust_fanout_logger::core::template;
use std::sync::Arc;

/// Accepts and forgets every line, so only the router's own cost is measured
struct NullSink;

impl Sink for NullSink {
    fn write_line(&mut self, line: &str) -> Result<()> {
        black_box(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn router_with(count: usize, threshold: Severity) -> Router {
    let mut builder = Router::builder();
    for _ in 0..count {
        builder = builder.destination(
            Destination::new(NullSink, threshold, DEFAULT_FORMAT).expect("destination"),
        );
    }
    builder.build()
}

// ============================================================================
// Template Benchmarks
// ============================================================================

fn bench_template_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_render");
    group.throughput(Throughput::Elements(1));

    let default_args = [FormatArg::from("WARNING"), FormatArg::from("disk at 91%")];
    group.bench_function("default_format", |b| {
        b.iter(|| template::render(black_box(DEFAULT_FORMAT), black_box(&default_args)))
    });

    let mixed_args = [
        FormatArg::from("api"),
        FormatArg::from(404u16),
        FormatArg::from(12.345f64),
    ];
    group.bench_function("mixed_verbs", |b| {
        b.iter(|| {
            template::render(
                black_box("service=%-8s status=%03d latency=%.2fms"),
                black_box(&mixed_args),
            )
        })
    });

    group.finish();
}

// ============================================================================
// Call Latency Benchmarks
// ============================================================================

fn bench_log_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_call");
    group.throughput(Throughput::Elements(1));

    let router = router_with(1, Severity::Debug);

    group.bench_function("log", |b| {
        b.iter(|| router.log(Severity::Info, black_box("Info message")))
    });

    group.bench_function("logf", |b| {
        b.iter(|| {
            router.logf(
                Severity::Info,
                black_box("request %s took %dms"),
                &[FormatArg::from("GET /"), FormatArg::from(12)],
            )
        })
    });

    group.finish();
    router.stop_all().expect("stop");
}

fn bench_threshold_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold_filtering");
    group.throughput(Throughput::Elements(1));

    let router = router_with(4, Severity::Warning);

    group.bench_function("below_threshold", |b| {
        b.iter(|| router.debug(black_box("filtered out")))
    });

    group.bench_function("above_threshold", |b| {
        b.iter(|| router.error(black_box("delivered")))
    });

    group.finish();
    router.stop_all().expect("stop");
}

// ============================================================================
// Fan-out Benchmarks
// ============================================================================

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");
    group.throughput(Throughput::Elements(1));

    for count in [1usize, 2, 4, 8] {
        let router = router_with(count, Severity::Debug);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| router.info(black_box("fan-out message")))
        });
        router.stop_all().expect("stop");
    }

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.throughput(Throughput::Elements(400));

    let router = Arc::new(router_with(2, Severity::Debug));

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let router = Arc::clone(&router);
                    std::thread::spawn(move || {
                        for _ in 0..100 {
                            let _ = router.info("Concurrent message");
                        }
                    })
                })
                .collect();

            for handle in handles {
                let _ = handle.join();
            }
        });
    });

    group.finish();
    router.stop_all().expect("stop");
}

criterion_group!(
    benches,
    bench_template_render,
    bench_log_call,
    bench_threshold_filtering,
    bench_fan_out,
    bench_concurrent_logging,
);
criterion_main!(benches);
