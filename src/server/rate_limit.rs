/*!
 * Sliding window rate limiting of tool calls.
 */

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::app_config::RateLimitConfig;

/// Allows at most `max_requests` calls in any `window`
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests: max_requests as usize,
            window,
            calls: Mutex::new(VecDeque::with_capacity(max_requests as usize)),
        }
    }

    /// Build a limiter from configuration, `None` when disabled
    pub fn from_config(config: &RateLimitConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(config.requests, Duration::from_secs(config.window_secs)))
    }

    /// Record a call, or return how long to wait for a free slot
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.try_acquire_at(Instant::now())
    }

    fn try_acquire_at(&self, now: Instant) -> Result<(), Duration> {
        let mut calls = self.calls.lock();

        while let Some(oldest) = calls.front() {
            if now.duration_since(*oldest) >= self.window {
                calls.pop_front();
            } else {
                break;
            }
        }

        if calls.len() < self.max_requests {
            calls.push_back(now);
            return Ok(());
        }

        let oldest = calls.front().copied().unwrap_or(now);
        Err(self.window.saturating_sub(now.duration_since(oldest)))
    }

    /// Calls recorded in the current window
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}
