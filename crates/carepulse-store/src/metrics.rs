//! Store operation metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Operation counters and latency accumulators for a store backend.
#[derive(Debug)]
pub struct StoreMetrics {
    read_count: AtomicU64,
    read_latency_us: AtomicU64,
    read_errors: AtomicU64,

    write_count: AtomicU64,
    write_latency_us: AtomicU64,
    write_errors: AtomicU64,

    delete_count: AtomicU64,
    delete_latency_us: AtomicU64,
    delete_errors: AtomicU64,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self {
            read_count: AtomicU64::new(0),
            read_latency_us: AtomicU64::new(0),
            read_errors: AtomicU64::new(0),
            write_count: AtomicU64::new(0),
            write_latency_us: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            delete_count: AtomicU64::new(0),
            delete_latency_us: AtomicU64::new(0),
            delete_errors: AtomicU64::new(0),
        }
    }

    /// Record a read operation (get, query, or scan).
    pub fn record_read(&self, duration: Duration, error: bool) {
        self.read_count.fetch_add(1, Ordering::Relaxed);
        self.read_latency_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        if error {
            self.read_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a write operation (put or batch write).
    pub fn record_write(&self, duration: Duration, error: bool) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.write_latency_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        if error {
            self.write_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a delete operation.
    pub fn record_delete(&self, duration: Duration, error: bool) {
        self.delete_count.fetch_add(1, Ordering::Relaxed);
        self.delete_latency_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        if error {
            self.delete_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get a point-in-time snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let read_count = self.read_count.load(Ordering::Relaxed);
        let write_count = self.write_count.load(Ordering::Relaxed);
        let delete_count = self.delete_count.load(Ordering::Relaxed);

        let read_latency_us = self.read_latency_us.load(Ordering::Relaxed);
        let write_latency_us = self.write_latency_us.load(Ordering::Relaxed);
        let delete_latency_us = self.delete_latency_us.load(Ordering::Relaxed);

        MetricsSnapshot {
            read_count,
            read_avg_latency_us: if read_count > 0 { read_latency_us / read_count } else { 0 },
            read_errors: self.read_errors.load(Ordering::Relaxed),
            write_count,
            write_avg_latency_us: if write_count > 0 { write_latency_us / write_count } else { 0 },
            write_errors: self.write_errors.load(Ordering::Relaxed),
            delete_count,
            delete_avg_latency_us: if delete_count > 0 {
                delete_latency_us / delete_count
            } else {
                0
            },
            delete_errors: self.delete_errors.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.read_count.store(0, Ordering::Relaxed);
        self.read_latency_us.store(0, Ordering::Relaxed);
        self.read_errors.store(0, Ordering::Relaxed);
        self.write_count.store(0, Ordering::Relaxed);
        self.write_latency_us.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
        self.delete_count.store(0, Ordering::Relaxed);
        self.delete_latency_us.store(0, Ordering::Relaxed);
        self.delete_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub read_count: u64,
    pub read_avg_latency_us: u64,
    pub read_errors: u64,
    pub write_count: u64,
    pub write_avg_latency_us: u64,
    pub write_errors: u64,
    pub delete_count: u64,
    pub delete_avg_latency_us: u64,
    pub delete_errors: u64,
}

/// Helper to measure operation duration.
pub struct OpTimer {
    start: Instant,
}

impl OpTimer {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for OpTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = StoreMetrics::new();

        metrics.record_read(Duration::from_micros(100), false);
        metrics.record_read(Duration::from_micros(300), true);
        metrics.record_write(Duration::from_micros(500), false);
        metrics.record_delete(Duration::from_micros(50), false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.read_count, 2);
        assert_eq!(snapshot.read_avg_latency_us, 200);
        assert_eq!(snapshot.read_errors, 1);
        assert_eq!(snapshot.write_count, 1);
        assert_eq!(snapshot.delete_count, 1);

        metrics.reset();
        assert_eq!(metrics.snapshot().read_count, 0);
    }
}
