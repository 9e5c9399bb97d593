//! Lightweight run timing.
//!
//! Timers are inert unless enabled with [`enable_timing`] or the `FD_TIMING`
//! environment variable. Summaries go through `tracing`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable performance timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Disable performance timing globally.
pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("FD_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    /// Stop the timer and return elapsed time in seconds, or None if timing is off.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }

    /// Stop the timer and add the elapsed time to `acc`.
    pub fn stop_into(self, acc: &AccumulatingTimer) {
        let label = self.label;
        if let Some(elapsed) = self.stop() {
            tracing::trace!(target: "fd::timing", label, elapsed_s = elapsed, "timer");
            acc.record(elapsed);
        }
    }
}

/// Accumulating timer for tracking total time across multiple calls.
pub struct AccumulatingTimer {
    total_ns: AtomicU64,
    count: AtomicU64,
}

impl Default for AccumulatingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulatingTimer {
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a timing measurement.
    pub fn record(&self, duration_s: f64) {
        let nanos = (duration_s * 1e9) as u64;
        self.total_ns.fetch_add(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Total time spent (in seconds).
    pub fn total_seconds(&self) -> f64 {
        self.total_ns.load(Ordering::Relaxed) as f64 / 1e9
    }

    /// Number of calls.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Average time per call (in seconds).
    pub fn average_seconds(&self) -> f64 {
        let count = self.count();
        if count > 0 {
            self.total_seconds() / count as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.total_ns.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}

/// Per-phase timers of the network time step.
pub mod step_timing {
    use super::AccumulatingTimer;

    /// Conductance evaluation over all edges
    pub static CONDUCTANCE: AccumulatingTimer = AccumulatingTimer::new();
    /// Laplacian assembly and head solve
    pub static HEAD_SOLVE: AccumulatingTimer = AccumulatingTimer::new();
    /// Causal edge ordering
    pub static ORDERING: AccumulatingTimer = AccumulatingTimer::new();
    /// Channel integration over all edges
    pub static CHANNEL_STEP: AccumulatingTimer = AccumulatingTimer::new();
    /// Remeshing round trips
    pub static REMESH: AccumulatingTimer = AccumulatingTimer::new();

    pub fn reset_all() {
        CONDUCTANCE.reset();
        HEAD_SOLVE.reset();
        ORDERING.reset();
        CHANNEL_STEP.reset();
        REMESH.reset();
    }

    /// Log a per-phase breakdown (no-op when timing is disabled).
    pub fn log_summary() {
        if !super::is_enabled() {
            return;
        }
        for (phase, timer) in [
            ("conductance", &CONDUCTANCE),
            ("head_solve", &HEAD_SOLVE),
            ("ordering", &ORDERING),
            ("channel_step", &CHANNEL_STEP),
            ("remesh", &REMESH),
        ] {
            if timer.count() > 0 {
                tracing::info!(
                    target: "fd::timing",
                    phase,
                    calls = timer.count(),
                    total_s = timer.total_seconds(),
                    avg_ms = timer.average_seconds() * 1000.0,
                    "phase timing"
                );
            }
        }
    }
}
