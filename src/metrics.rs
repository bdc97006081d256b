// Batch metrics
//
// Lightweight counters for one batch run, logged through tracing at the end

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters for a batch run
///
/// Atomics keep `record_*` usable through a shared reference.
#[derive(Debug)]
pub struct Metrics {
    /// Puzzles whose solution was stored
    pub puzzles_solved: AtomicUsize,

    /// Puzzles the solver failed on (non-zero exit or timeout)
    pub puzzles_failed: AtomicUsize,

    /// Matching entries that were not regular files
    pub entries_skipped: AtomicUsize,

    /// Time spent inside the solver, in milliseconds
    pub total_solve_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            puzzles_solved: AtomicUsize::new(0),
            puzzles_failed: AtomicUsize::new(0),
            entries_skipped: AtomicUsize::new(0),
            total_solve_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_solved(&self, duration: Duration) {
        self.puzzles_solved.fetch_add(1, Ordering::Relaxed);
        self.record_solve_time(duration);
    }

    pub fn record_failed(&self, duration: Duration) {
        self.puzzles_failed.fetch_add(1, Ordering::Relaxed);
        self.record_solve_time(duration);
    }

    pub fn record_skipped(&self, count: usize) {
        self.entries_skipped.fetch_add(count, Ordering::Relaxed);
    }

    fn record_solve_time(&self, duration: Duration) {
        self.total_solve_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average solver time per attempted puzzle in milliseconds
    pub fn avg_solve_time_ms(&self) -> f64 {
        let total = self.total_solve_time_ms.load(Ordering::Relaxed);
        let count = self.puzzles_solved.load(Ordering::Relaxed)
            + self.puzzles_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Puzzles: {} solved, {} failed, {} skipped entries",
            self.puzzles_solved.load(Ordering::Relaxed),
            self.puzzles_failed.load(Ordering::Relaxed),
            self.entries_skipped.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Solver time: {:.2}s (avg: {:.2}ms per puzzle), wall time {:.2}s",
            self.total_solve_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_solve_time_ms(),
            self.uptime().as_secs_f64()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
