use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::errors::AppError;

/// Process-wide sliding-window limiter for LLM calls. Timestamps older than
/// the window are evicted lazily on each check; an over-limit call fails
/// immediately instead of queuing.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: VecDeque::with_capacity(max_calls),
        }
    }

    pub fn try_acquire(&mut self) -> Result<(), AppError> {
        self.try_acquire_at(Instant::now())
    }

    pub fn try_acquire_at(&mut self, now: Instant) -> Result<(), AppError> {
        while let Some(&oldest) = self.calls.front() {
            if now.duration_since(oldest) >= self.window {
                self.calls.pop_front();
            } else {
                break;
            }
        }

        if self.calls.len() >= self.max_calls {
            return Err(AppError::RateLimited);
        }

        self.calls.push_back(now);
        Ok(())
    }
}
