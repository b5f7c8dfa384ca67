//! Token-bucket rate limiting for embedding calls.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// How fast embedding calls may be issued.
///
/// The bucket starts full with `capacity` tokens and regains one token every
/// `refill_interval`. A zero interval disables limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Burst size.
    pub capacity: u32,
    /// Time to regain one token.
    pub refill_interval: Duration,
}

impl RateLimit {
    /// One call per `interval`, no burst.
    #[must_use]
    pub const fn per_interval(interval: Duration) -> Self {
        Self {
            capacity: 1,
            refill_interval: interval,
        }
    }

    /// No limiting at all.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            capacity: 1,
            refill_interval: Duration::ZERO,
        }
    }

    /// Whether this limit ever makes a caller wait.
    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.refill_interval.is_zero()
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::per_interval(Duration::from_millis(100))
    }
}

#[derive(Debug)]
struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

/// Async token bucket shared by every embedding call of one store.
#[derive(Debug)]
pub struct TokenBucket {
    limit: RateLimit,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Creates a full bucket.
    #[must_use]
    pub fn new(limit: RateLimit) -> Self {
        let capacity = limit.capacity.max(1);
        Self {
            limit: RateLimit { capacity, ..limit },
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// The configured limit.
    #[must_use]
    pub const fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Waits until a token is available and takes it.
    pub async fn acquire(&self) {
        if self.limit.is_unlimited() {
            return;
        }
        loop {
            let wait = match self.try_take(Instant::now()) {
                None => return,
                Some(wait) => wait,
            };
            async_io::Timer::after(wait).await;
        }
    }

    /// Takes a token if one is available, otherwise returns how long until the next refill.
    fn try_take(&self, now: Instant) -> Option<Duration> {
        let interval = self.limit.refill_interval;
        let mut state = self.state.lock();

        let elapsed = now.saturating_duration_since(state.last_refill);
        let refills = elapsed.as_nanos() / interval.as_nanos();
        if refills > 0 {
            let refills = u32::try_from(refills).unwrap_or(u32::MAX);
            state.tokens = state.tokens.saturating_add(refills).min(self.limit.capacity);
            state.last_refill = if state.tokens == self.limit.capacity {
                now
            } else {
                state.last_refill + interval * refills
            };
        }

        if state.tokens > 0 {
            state.tokens -= 1;
            if state.tokens + 1 == self.limit.capacity {
                // The refill clock starts when the bucket stops being full.
                state.last_refill = now;
            }
            return None;
        }

        let since_refill = now.saturating_duration_since(state.last_refill);
        Some(interval.saturating_sub(since_refill).max(Duration::from_millis(1)))
    }
}
