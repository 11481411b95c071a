// src/limiter.rs - Per-key token-bucket admission control
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use log::debug;

/// Token bucket tracked for a single client key.
///
/// Refill is stepwise: once one or more full intervals have elapsed the
/// bucket resets to capacity, rather than trickling tokens in continuously.
#[derive(Debug)]
struct Bucket {
    tokens: u32,
    last_refill: Instant,
}

/// Per-key rate limiter backed by a sharded concurrent map.
///
/// Buckets are created lazily on first sight of a key and live until swept.
/// The handle is cheap to clone and safe to share across worker threads.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    capacity: u32,
    refill_interval: Duration,
    buckets: DashMap<String, Bucket>,
}

// Buckets idle for this many whole intervals are eligible for eviction. An
// idle bucket would refill to capacity on its next hit anyway, so dropping
// it and re-creating it lazily is observationally equivalent.
const IDLE_SWEEP_INTERVALS: u32 = 10;

impl RateLimiter {
    pub fn new(capacity: u32, refill_interval: Duration) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                capacity,
                refill_interval,
                buckets: DashMap::new(),
            }),
        }
    }

    /// Decides whether the caller identified by `key` may proceed, consuming
    /// one token on admission.
    ///
    /// Total over all string keys: never fails, never blocks beyond the
    /// shard lock held while the bucket for `key` is mutated. Admissions for
    /// a single key are serialized by that shard lock, so concurrent callers
    /// can never consume more tokens than a sequential history would allow.
    pub fn admit(&self, key: &str) -> bool {
        let now = Instant::now();

        // The entry API gives exactly-once insertion: the loser of a
        // first-time race reuses the winner's bucket.
        let mut entry = self
            .inner
            .buckets
            .entry(key.to_owned())
            .or_insert_with(|| Bucket {
                tokens: self.inner.capacity,
                last_refill: now,
            });
        let bucket = entry.value_mut();

        self.refill(bucket, now);

        if bucket.tokens >= 1 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Interval-aligned full refill: reset to capacity once per elapsed
    /// window, advancing `last_refill` by whole intervals only.
    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        let elapsed = now.duration_since(bucket.last_refill);
        if elapsed < self.inner.refill_interval {
            return;
        }

        let intervals = (elapsed.as_nanos() / self.inner.refill_interval.as_nanos()) as u32;
        bucket.tokens = self.inner.capacity;
        bucket.last_refill += self.inner.refill_interval * intervals;
    }

    /// Evicts buckets that have not refilled for `IDLE_SWEEP_INTERVALS`
    /// whole windows. Without this the registry grows one bucket per
    /// distinct key for the process lifetime.
    pub fn sweep_idle(&self) {
        let idle_after = self.inner.refill_interval * IDLE_SWEEP_INTERVALS;
        let before = self.inner.buckets.len();
        self.inner
            .buckets
            .retain(|_, bucket| bucket.last_refill.elapsed() < idle_after);
        let evicted = before - self.inner.buckets.len();
        if evicted > 0 {
            debug!(
                "Swept {} idle rate-limit bucket(s), {} remaining",
                evicted,
                self.inner.buckets.len()
            );
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.inner.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn admits_up_to_capacity_then_rejects() {
        let limiter = RateLimiter::new(100, MINUTE);

        for i in 0..100 {
            assert!(limiter.admit("1.2.3.4"), "call {} should be admitted", i);
        }
        assert!(!limiter.admit("1.2.3.4"), "101st call must be rejected");
        assert!(!limiter.admit("1.2.3.4"), "rejection must not consume tokens");
    }

    #[test]
    fn refill_restores_full_capacity() {
        let interval = Duration::from_millis(100);
        let limiter = RateLimiter::new(3, interval);

        for _ in 0..3 {
            assert!(limiter.admit("k"));
        }
        assert!(!limiter.admit("k"));

        thread::sleep(Duration::from_millis(150));

        for _ in 0..3 {
            assert!(limiter.admit("k"));
        }
        assert!(!limiter.admit("k"));
    }

    #[test]
    fn refill_resets_rather_than_accumulates() {
        let interval = Duration::from_millis(100);
        let limiter = RateLimiter::new(2, interval);

        assert!(limiter.admit("k"));

        // More than two full intervals pass; tokens reset to capacity once,
        // they do not pile up to 2 * capacity.
        thread::sleep(Duration::from_millis(250));

        assert!(limiter.admit("k"));
        assert!(limiter.admit("k"));
        assert!(!limiter.admit("k"));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(2, MINUTE);

        assert!(limiter.admit("k1"));
        assert!(limiter.admit("k1"));
        assert!(!limiter.admit("k1"));

        assert!(limiter.admit("k2"));
        assert!(limiter.admit("k2"));
        assert!(!limiter.admit("k2"));
    }

    #[test]
    fn boundary_last_token() {
        let limiter = RateLimiter::new(1, MINUTE);

        assert!(limiter.admit("k"));
        assert!(!limiter.admit("k"));
    }

    #[test]
    fn total_over_arbitrary_keys() {
        let limiter = RateLimiter::new(1, MINUTE);

        assert!(limiter.admit(""));
        assert!(!limiter.admit(""));
        assert!(limiter.admit("2001:db8::8a2e:370:7334"));
    }

    #[test]
    fn concurrent_admits_never_exceed_capacity() {
        let limiter = RateLimiter::new(100, MINUTE);

        // 1000 concurrent calls for the same fresh key: exactly 100 may win.
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || {
                    (0..100)
                        .filter(|_| limiter.admit("198.51.100.7"))
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 100);
        // Exactly-once creation: all callers shared one bucket.
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn sweep_evicts_only_idle_buckets() {
        let interval = Duration::from_millis(10);
        let limiter = RateLimiter::new(5, interval);

        assert!(limiter.admit("stale"));
        thread::sleep(interval * (IDLE_SWEEP_INTERVALS + 2));
        assert!(limiter.admit("fresh"));

        limiter.sweep_idle();
        assert_eq!(limiter.len(), 1);

        // A swept key is simply re-created full on its next request.
        for _ in 0..5 {
            assert!(limiter.admit("stale"));
        }
        assert!(!limiter.admit("stale"));
    }

    #[test]
    fn scenario_exhaust_then_wait_out_the_window() {
        let interval = Duration::from_millis(80);
        let limiter = RateLimiter::new(100, interval);

        for _ in 0..100 {
            assert!(limiter.admit("1.2.3.4"));
        }
        assert!(!limiter.admit("1.2.3.4"));

        thread::sleep(interval + Duration::from_millis(20));
        assert!(limiter.admit("1.2.3.4"));
    }
}
