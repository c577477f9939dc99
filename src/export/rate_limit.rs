// src/export/rate_limit.rs
//! Request spacing shared by every worker of an export run.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Hands out evenly spaced request slots across threads.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Allows `per_second` requests per second; non-positive rates disable spacing.
    pub fn new(per_second: f64) -> Self {
        let interval = if per_second > 0.0 {
            Duration::from_secs_f64(1.0 / per_second)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reserves the next slot and returns how long the caller must wait for it.
    fn reserve(&self, now: Instant) -> Duration {
        let mut next_slot = self.next_slot.lock();
        let slot = match *next_slot {
            Some(next) if next > now => next,
            _ => now,
        };
        *next_slot = Some(slot + self.interval);
        slot - now
    }

    /// Blocks the calling thread until its request slot arrives.
    pub fn wait(&self) {
        let delay = self.reserve(Instant::now());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_spaced_by_interval() {
        let limiter = RateLimiter::new(2.0);
        let now = Instant::now();

        assert_eq!(limiter.reserve(now), Duration::ZERO);
        assert_eq!(limiter.reserve(now), Duration::from_millis(500));
        assert_eq!(limiter.reserve(now), Duration::from_millis(1000));
    }

    #[test]
    fn test_idle_time_is_not_banked() {
        let limiter = RateLimiter::new(2.0);
        let start = Instant::now();
        limiter.reserve(start);

        let later = start + Duration::from_secs(10);
        assert_eq!(limiter.reserve(later), Duration::ZERO);
        assert_eq!(limiter.reserve(later), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_rate_never_waits() {
        let limiter = RateLimiter::new(0.0);
        let now = Instant::now();
        assert_eq!(limiter.reserve(now), Duration::ZERO);
        assert_eq!(limiter.reserve(now), Duration::ZERO);
    }
}
