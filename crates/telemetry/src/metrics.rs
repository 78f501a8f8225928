//! Internal metrics collection.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s
    buckets: [AtomicU64; 8],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 8] = [1, 5, 10, 50, 100, 500, 1000, 5000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[7].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum.load(Ordering::Relaxed) as f64 / count as f64
        }
    }
}

/// Collected metrics for the contact relay.
#[derive(Debug, Default)]
pub struct Metrics {
    // Submission pipeline
    pub submissions_received: Counter,
    pub submissions_accepted: Counter,
    pub submissions_invalid: Counter,
    pub rate_limited_requests: Counter,
    pub captcha_rejections: Counter,

    // Delivery
    pub emails_sent: Counter,
    pub email_send_errors: Counter,

    // Latency
    pub submit_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            submissions_received: self.submissions_received.get(),
            submissions_accepted: self.submissions_accepted.get(),
            submissions_invalid: self.submissions_invalid.get(),
            rate_limited_requests: self.rate_limited_requests.get(),
            captcha_rejections: self.captcha_rejections.get(),
            emails_sent: self.emails_sent.get(),
            email_send_errors: self.email_send_errors.get(),
            submit_latency_mean_ms: self.submit_latency_ms.mean(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub submissions_received: u64,
    pub submissions_accepted: u64,
    pub submissions_invalid: u64,
    pub rate_limited_requests: u64,
    pub captcha_rejections: u64,
    pub emails_sent: u64,
    pub email_send_errors: u64,
    pub submit_latency_mean_ms: f64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
