//! Reconnection backoff for the pump loops.

use std::time::Duration;

/// How long to wait between failed connection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after the first failure.
    pub base: Duration,
    /// Ceiling for the doubled delay.
    pub max: Duration,
    /// Consecutive failures after which `Backoff::exhausted` reports true.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry immediately, forever. This is the tight busy-retry loop; only
    /// use it against a broker known to be local.
    pub const fn immediate() -> Self {
        Self {
            base: Duration::ZERO,
            max: Duration::ZERO,
            max_attempts: None,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            max: Duration::from_secs(5),
            max_attempts: None,
        }
    }
}

/// Exponential backoff state for one pump loop.
///
/// ```rust
/// use mqclient::client::retry::{Backoff, RetryPolicy};
/// use std::time::Duration;
///
/// let mut backoff = Backoff::new(RetryPolicy {
///     base: Duration::from_millis(100),
///     max: Duration::from_secs(10),
///     max_attempts: None,
/// });
/// assert_eq!(backoff.next_delay(), Duration::from_millis(100));
/// assert_eq!(backoff.next_delay(), Duration::from_millis(200));
/// backoff.reset();
/// assert_eq!(backoff.next_delay(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: RetryPolicy,
    attempt: u32,
    current: Duration,
}

impl Backoff {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            current: policy.base,
        }
    }

    /// Delay to sleep before the next attempt. Doubles on every call until
    /// it reaches `policy.max`.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;

        self.attempt = self.attempt.saturating_add(1);
        self.current = self.policy.base * (1_u32 << self.attempt.min(10));
        if self.current > self.policy.max {
            self.current = self.policy.max;
        }

        delay
    }

    /// Back to the base delay after a successful connection.
    pub fn reset(&mut self) {
        self.attempt = 0;
        self.current = self.policy.base;
    }

    #[inline]
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// True once `max_attempts` consecutive failures have been recorded.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.policy
            .max_attempts
            .is_some_and(|max| self.attempt >= max)
    }
}
