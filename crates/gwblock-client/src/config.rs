//! Client retry and rate-limit configuration.

use rand::Rng;
use std::time::Duration;

/// Backoff policy for the unbounded retry loop.
///
/// There is no maximum attempt count: a run is expected to eventually
/// succeed against a flaky remote or be killed externally.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Base delay multiplied by the random exponential factor
    pub multiplier: Duration,

    /// Cap applied to every computed delay
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            multiplier: Duration::from_secs(1),
            max_wait: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Set the backoff multiplier
    #[must_use]
    pub const fn multiplier(mut self, duration: Duration) -> Self {
        self.multiplier = duration;
        self
    }

    /// Set the per-attempt delay cap
    #[must_use]
    pub const fn max_wait(mut self, duration: Duration) -> Self {
        self.max_wait = duration;
        self
    }

    /// Compute the jittered delay for a given attempt (counted from 1):
    /// `min(max_wait, multiplier * 2^Uniform(0, attempt-1))`.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = rand::thread_rng().gen_range(0.0..=f64::from(attempt.max(1) - 1));
        let delay = self.multiplier.as_secs_f64() * exponent.exp2();
        Duration::from_secs_f64(delay.min(self.max_wait.as_secs_f64()))
    }
}
