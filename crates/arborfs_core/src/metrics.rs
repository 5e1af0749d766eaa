//! Cycle counters and structured logging for one mount.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::growth::CycleStats;

/// Per-mount metrics collector.
pub struct Metrics {
    cycles: AtomicU64,
    branches_grown: AtomicU64,
    leaves_grown: AtomicU64,
    lookups: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cycles: AtomicU64::new(0),
            branches_grown: AtomicU64::new(0),
            leaves_grown: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a completed growth cycle with its duration.
    pub fn record_cycle(&self, duration: Duration, stats: &CycleStats) {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        self.branches_grown
            .fetch_add(stats.branches_added, Ordering::Relaxed);
        self.leaves_grown
            .fetch_add(stats.leaves_added, Ordering::Relaxed);

        // Cycles get combinatorially more expensive with the year, so every
        // one is worth an info line.
        tracing::info!(
            cycle,
            year = stats.year,
            fanout = stats.fanout,
            branches_added = stats.branches_added,
            leaves_added = stats.leaves_added,
            capped = stats.capped,
            duration_ms = duration.as_millis() as u64,
            "Growth cycle"
        );
    }

    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn cycle_count(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn branches_grown(&self) -> u64 {
        self.branches_grown.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn leaves_grown(&self) -> u64 {
        self.leaves_grown.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Elapsed time since the mount came up.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
pub fn init_logging() {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(tracing::Level::INFO)
            .finish(),
    )
    .ok();
}
