use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::StoreError;
use crate::recommend::criteria::Criterion;

/// Hook for degraded scoring and completed selections. Implementations must be
/// cheap; they run on the scoring path.
pub trait ScoringObserver: Send + Sync {
    fn criterion_degraded(
        &self,
        criterion: Criterion,
        user_id: &str,
        candidate_id: &str,
        error: &StoreError,
    );

    fn history_unavailable(&self, user_id: &str, error: &StoreError);

    fn selection_completed(&self, pool_size: usize, returned: usize, elapsed: Duration);
}

/// Welford accumulator: mean and variance without keeping samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl OnlineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance; zero until two values have been seen.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub selections: u64,
    pub history_degraded: u64,
    pub timing_degraded: u64,
    pub history_list_failures: u64,
    pub latency_ms: OnlineStats,
    pub pool_size: OnlineStats,
}

/// Default observer: counters only. Failures are logged where they are caught.
#[derive(Debug, Default)]
pub struct ScoringMetrics {
    selections: AtomicU64,
    history_degraded: AtomicU64,
    timing_degraded: AtomicU64,
    other_degraded: AtomicU64,
    history_list_failures: AtomicU64,
    latency_ms: Mutex<OnlineStats>,
    pool_size: Mutex<OnlineStats>,
}

impl ScoringMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn degraded_count(&self, criterion: Criterion) -> u64 {
        match criterion {
            Criterion::History => self.history_degraded.load(Ordering::Relaxed),
            Criterion::Timing => self.timing_degraded.load(Ordering::Relaxed),
            _ => self.other_degraded.load(Ordering::Relaxed),
        }
    }

    pub fn selections(&self) -> u64 {
        self.selections.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            selections: self.selections(),
            history_degraded: self.history_degraded.load(Ordering::Relaxed),
            timing_degraded: self.timing_degraded.load(Ordering::Relaxed),
            history_list_failures: self.history_list_failures.load(Ordering::Relaxed),
            latency_ms: *self.latency_ms.lock(),
            pool_size: *self.pool_size.lock(),
        }
    }
}

impl ScoringObserver for ScoringMetrics {
    fn criterion_degraded(
        &self,
        criterion: Criterion,
        _user_id: &str,
        _candidate_id: &str,
        _error: &StoreError,
    ) {
        let counter = match criterion {
            Criterion::History => &self.history_degraded,
            Criterion::Timing => &self.timing_degraded,
            _ => &self.other_degraded,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn history_unavailable(&self, _user_id: &str, _error: &StoreError) {
        self.history_list_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn selection_completed(&self, pool_size: usize, returned: usize, elapsed: Duration) {
        self.selections.fetch_add(1, Ordering::Relaxed);
        let latency_ms = elapsed.as_secs_f64() * 1000.0;
        self.latency_ms.lock().push(latency_ms);
        self.pool_size.lock().push(pool_size as f64);
        tracing::debug!(pool_size, returned, latency_ms, "selection completed");
    }
}
