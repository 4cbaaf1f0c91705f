use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DashMapStateStore;
use governor::{Quota, RateLimiter};

use crate::error::RateLimitError;

type KeyedLimiter = RateLimiter<String, DashMapStateStore<String>, DefaultClock>;

/// Checks between sweeps of keys whose quota has fully replenished
const PRUNE_EVERY: u64 = 1024;

/// In-memory keyed rate limiter backed by governor
///
/// Allows a burst of `max_requests`, replenished evenly over `window`.
#[derive(Clone)]
pub struct MemoryLimiter {
    scope: &'static str,
    limiter: Arc<KeyedLimiter>,
    clock: DefaultClock,
    checks: Arc<AtomicU64>,
}

impl MemoryLimiter {
    /// Create a limiter allowing `max_requests` per `window` for each key
    pub fn new(scope: &'static str, max_requests: u32, window: Duration) -> Result<Self, RateLimitError> {
        let burst = NonZeroU32::new(max_requests)
            .ok_or_else(|| RateLimitError::Config(format!("{scope}: requests must be > 0")))?;

        if window.is_zero() {
            return Err(RateLimitError::Config(format!("{scope}: window must be > 0")));
        }

        let quota = Quota::with_period(window / burst.get())
            .ok_or_else(|| RateLimitError::Config(format!("{scope}: window too short for {burst} requests")))?
            .allow_burst(burst);

        Ok(Self {
            scope,
            limiter: Arc::new(RateLimiter::dashmap(quota)),
            clock: DefaultClock::default(),
            checks: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Record one request for `key`, failing once its quota is spent
    ///
    /// Every so often the check also drops idle keys, so the store stays
    /// bounded by the number of recently active clients.
    pub fn check(&self, key: &str) -> Result<(), RateLimitError> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_EVERY == PRUNE_EVERY - 1 {
            self.prune();
        }

        self.limiter.check_key(&key.to_owned()).map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            RateLimitError::Exceeded {
                scope: self.scope,
                retry_after: Some(wait.as_secs().max(1)),
            }
        })
    }

    /// Forget keys that are back to a full quota
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        tracing::trace!(scope = self.scope, tracked = self.limiter.len(), "pruned idle rate limit keys");
    }

    /// Number of keys currently held in the store
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }
}

#[cfg(test)]
mod tests {
    use courier_core::Failure;

    use super::*;

    #[test]
    fn allows_burst_then_rejects() {
        let limiter = MemoryLimiter::new("per_ip", 2, Duration::from_secs(60)).unwrap();

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.1").is_ok());

        let err = limiter.check("10.0.0.1").unwrap_err();
        let limited = err.rate_limit().unwrap();
        assert!(limited.retry_after.is_some_and(|secs| (1..=30).contains(&secs)));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = MemoryLimiter::new("per_ip", 1, Duration::from_secs(60)).unwrap();

        assert!(limiter.check("10.0.0.1").is_ok());
        assert!(limiter.check("10.0.0.2").is_ok());
        assert!(limiter.check("10.0.0.1").is_err());
    }

    #[test]
    fn idle_keys_are_pruned() {
        let limiter = MemoryLimiter::new("per_ip", 1, Duration::from_millis(20)).unwrap();

        for n in 0..50 {
            assert!(limiter.check(&format!("198.51.100.{n}")).is_ok());
        }
        assert_eq!(limiter.tracked_keys(), 50);

        std::thread::sleep(Duration::from_millis(80));
        limiter.prune();

        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn busy_keys_survive_pruning() {
        let limiter = MemoryLimiter::new("per_ip", 1, Duration::from_secs(60)).unwrap();

        assert!(limiter.check("10.0.0.1").is_ok());
        limiter.prune();

        assert_eq!(limiter.tracked_keys(), 1);
        assert!(limiter.check("10.0.0.1").is_err());
    }

    #[test]
    fn checks_sweep_the_store_periodically() {
        let limiter = MemoryLimiter::new("per_ip", 1, Duration::from_millis(1)).unwrap();

        for n in 0..PRUNE_EVERY - 1 {
            let _ = limiter.check(&format!("key-{n}"));
        }
        std::thread::sleep(Duration::from_millis(20));

        // The next check completes a sweep before recording its own key
        assert!(limiter.check("last").is_ok());
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn rejects_zero_requests() {
        assert!(matches!(
            MemoryLimiter::new("global", 0, Duration::from_secs(1)),
            Err(RateLimitError::Config(_))
        ));
    }
}
