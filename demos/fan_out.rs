//! Fan-out example
//!
//! Delivers one stream of log calls to the console and two files, each with
//! its own threshold and format.
//!
//! Run with: cargo run --example fan_out

use rust_fanout_logger::prelude::*;
use rust_fanout_logger::{errorf, infof};

fn main() -> Result<()> {
    println!("=== Rust Fan-out Logger - Fan-out Example ===\n");

    let mut router = Router::builder()
        // Everything down to Debug on stdout, default "%-10s %s" layout
        .destination(Destination::stdout(Severity::Debug, DEFAULT_FORMAT)?)
        // Only Warning and worse in the errors file
        .destination(Destination::file(
            "fan_out_errors.log",
            Severity::Warning,
            "[%s] %s",
        )?)
        // Info and worse in the application file
        .destination(Destination::file("fan_out_app.log", Severity::Info, "%s: %s")?)
        .build();

    println!("1. Plain messages, wrapped in each destination's format:");
    router.debug("loading configuration")?;
    router.info("application started")?;
    router.warning("cache directory missing, using /tmp")?;

    println!("\n2. Caller-formatted messages bypass destination formats:");
    infof!(router, "worker %d of %d ready", 1, 4)?;
    errorf!(router, "request %s failed after %.1fs", "GET /health", 2.5)?;

    println!("\n3. Clearing the application file:");
    router.clear_file_destination(2)?;
    router.notice("application log truncated")?;

    // Let the workers catch up before reporting
    std::thread::sleep(std::time::Duration::from_millis(100));
    for destination in router.destinations() {
        let metrics = destination.metrics();
        println!(
            "   {:<28} written={} discarded={}",
            destination.name(),
            metrics.written(),
            metrics.discarded()
        );
    }

    router.stop_all()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'fan_out_errors.log' and 'fan_out_app.log'");

    Ok(())
}
