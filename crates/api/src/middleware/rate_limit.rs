//! Rate limiting middleware.
//!
//! Fixed window per client key, deliberately coarse: a client can burst
//! up to `max_requests` at the tail of one window and again right after
//! the reset. Acceptable for an anti-abuse heuristic, not a quota.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Fixed-window rate limiter.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    config: RateLimitConfig,
}

#[derive(Clone)]
pub struct RateLimitConfig {
    /// Window length
    pub window: Duration,
    /// Max requests per window
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 3,
        }
    }
}

struct Window {
    count: u32,
    window_start: Instant,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Check and record one request for the given key.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Time-injectable variant of [`check`](Self::check).
    ///
    /// The read-modify-write happens under one lock so concurrent
    /// requests for the same key never undercount.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock();

        match windows.get_mut(key) {
            // Window still live: count against it
            Some(window) if now.duration_since(window.window_start) <= self.config.window => {
                if window.count >= self.config.max_requests {
                    return false;
                }
                window.count += 1;
                true
            }
            // First request for this key, or the previous window expired
            _ => {
                windows.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        window_start: now,
                    },
                );
                true
            }
        }
    }

    /// Sweep windows that have been idle longer than `max_age`.
    pub fn cleanup(&self, max_age: Duration) {
        let mut windows = self.windows.lock();
        let now = Instant::now();

        windows.retain(|_, w| now.duration_since(w.window_start) < max_age);
    }
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<RateLimiter>;
