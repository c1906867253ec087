//! Local sliding-window rate limiter for outbound LLM calls

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Clock abstraction so the window can be driven deterministically in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sliding-window limiter: at most `max_requests` acquisitions inside any
/// `window` interval. Not fair and not distributed; it only protects the
/// local process from burning through the provider quota.
pub struct SlidingWindowLimiter {
    max_requests: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            timestamps: Mutex::new(VecDeque::new()),
            clock,
        }
    }

    /// Try to acquire a slot; returns false when the window is full
    pub fn try_acquire(&self) -> bool {
        let now = self.clock.now();
        let mut timestamps = self.timestamps.lock();

        while let Some(front) = timestamps.front() {
            if now.duration_since(*front) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() < self.max_requests {
            timestamps.push_back(now);
            true
        } else {
            false
        }
    }
}
