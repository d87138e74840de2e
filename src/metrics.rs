// Batch metrics module
//
// Lightweight counters for a batch run, logged when the run completes.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::models::ResultLabel;

/// Counters for one batch run.
///
/// Uses atomic operations so the metrics can be shared freely; the batch
/// loop itself is strictly sequential.
#[derive(Debug)]
pub struct Metrics {
    /// Pairs classified as having no conflict
    pub pairs_no_conflict: AtomicUsize,

    /// Pairs where the checker reported a conflict
    pub pairs_conflict: AtomicUsize,

    /// Pairs rejected by the build/extraction step
    pub pairs_staging_error: AtomicUsize,

    /// Pairs whose log matched no known marker
    pub pairs_unknown: AtomicUsize,

    /// Cumulative model-checker wall time in milliseconds
    pub checker_time_ms: AtomicU64,

    /// Batch start time
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            pairs_no_conflict: AtomicUsize::new(0),
            pairs_conflict: AtomicUsize::new(0),
            pairs_staging_error: AtomicUsize::new(0),
            pairs_unknown: AtomicUsize::new(0),
            checker_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one classified pair.
    pub fn record_result(&self, label: ResultLabel) {
        let counter = match label {
            ResultLabel::NoConflict => &self.pairs_no_conflict,
            ResultLabel::Conflict => &self.pairs_conflict,
            ResultLabel::StagingError => &self.pairs_staging_error,
            ResultLabel::Unknown => &self.pairs_unknown,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record checker wall time for one pair.
    pub fn record_checker_time(&self, duration: Duration) {
        self.checker_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Total pairs recorded so far.
    pub fn total_pairs(&self) -> usize {
        self.pairs_no_conflict.load(Ordering::Relaxed)
            + self.pairs_conflict.load(Ordering::Relaxed)
            + self.pairs_staging_error.load(Ordering::Relaxed)
            + self.pairs_unknown.load(Ordering::Relaxed)
    }

    /// Time elapsed since the batch started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Log a summary of the batch.
    pub fn log_summary(&self) {
        tracing::info!(
            "Batch summary: {} pairs in {:.1}s (no conflict: {}, conflict: {}, staging errors: {}, unknown: {}), checker time: {:.1}s",
            self.total_pairs(),
            self.elapsed().as_secs_f32(),
            self.pairs_no_conflict.load(Ordering::Relaxed),
            self.pairs_conflict.load(Ordering::Relaxed),
            self.pairs_staging_error.load(Ordering::Relaxed),
            self.pairs_unknown.load(Ordering::Relaxed),
            self.checker_time_ms.load(Ordering::Relaxed) as f32 / 1000.0,
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
