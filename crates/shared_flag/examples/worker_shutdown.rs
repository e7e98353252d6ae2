//! Stop a pool of background workers with one shared flag.
//!
//! Run with `cargo run -p shared_flag --example worker_shutdown`. Set
//! `SHARED_FLAG_LOG=trace` to see the flag's own events.

use anyhow::{anyhow, Context, Result};
use shared_flag::{FlagHandle, SharedFlag, SharedFlagReader};
use shared_flag_logging::{init_logging, LogConfig};
use std::thread;
use std::time::Duration;

const WORKERS: usize = 3;
const TICK: Duration = Duration::from_millis(100);
const RUN_FOR: Duration = Duration::from_millis(550);

fn worker(id: usize, stop: SharedFlagReader) -> Result<u32> {
    let mut ticks = 0;
    // Keep looping until signalled to stop.
    while !stop.wait_for(TICK)? {
        ticks += 1;
        tracing::info!(worker = id, ticks, "working");
    }
    tracing::info!(worker = id, ticks, "stop observed");
    Ok(ticks)
}

fn main() -> Result<()> {
    init_logging(LogConfig {
        app_name: "worker_shutdown",
        verbose: true,
    })?;

    let stop = SharedFlag::new();
    let handles = (0..WORKERS)
        .map(|id| -> Result<_> {
            let reader = stop.reader()?;
            thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker(id, reader))
                .with_context(|| format!("Failed to spawn worker {}", id))
        })
        .collect::<Result<Vec<_>>>()?;

    thread::sleep(RUN_FOR);
    tracing::info!("signalling workers to stop");
    stop.set()?;

    for (id, handle) in handles.into_iter().enumerate() {
        let ticks = handle
            .join()
            .map_err(|_| anyhow!("worker {} panicked", id))??;
        tracing::info!(worker = id, ticks, "joined");
    }
    Ok(())
}
