//! Retry policy: attempt budget and backoff delays.

use std::time::Duration;

use crate::config::BusConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Backoff multiplier applied per further attempt.
    pub multiplier: f64,

    /// Upper bound for any single backoff delay.
    pub max_delay: Duration,

    /// Attempts (including the first) before a message is dead-lettered.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Delay before the next attempt: `base_delay * multiplier^(attempts - 1)`,
    /// capped at `max_delay`.
    ///
    /// `attempts` is the number of attempts already made (1-indexed); 0 is
    /// treated like 1.
    pub fn next_delay(&self, attempts: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = attempts.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        Duration::try_from_secs_f64(secs).map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    pub fn attempts_exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&BusConfig::default())
    }
}

impl From<&BusConfig> for RetryPolicy {
    fn from(config: &BusConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(config.base_delay_ms),
            multiplier: config.multiplier,
            max_delay: Duration::from_millis(config.max_delay_ms),
            max_attempts: config.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_policy_matches_default_config() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base_delay, Duration::from_secs(2));
        assert_eq!(policy.multiplier, 2.0);
        assert_eq!(policy.max_delay, Duration::from_secs(300));
        assert_eq!(policy.max_attempts, 5);
    }

    #[rstest]
    #[case::zero_attempts(0, 2)]
    #[case::first(1, 2)]
    #[case::second(2, 4)]
    #[case::third(3, 8)]
    #[case::fifth(5, 32)]
    fn exponential_backoff(#[case] attempts: u32, #[case] expected_secs: u64) {
        let policy = RetryPolicy::default();
        assert_eq!(policy.next_delay(attempts), Duration::from_secs(expected_secs));
    }

    #[rstest]
    #[case::below_cap(8, 256)]
    #[case::first_capped(9, 300)]
    #[case::duration_overflow(64, 300)]
    #[case::float_overflow(2_000, 300)]
    #[case::max_attempts(u32::MAX, 300)]
    fn backoff_is_capped(#[case] attempts: u32, #[case] expected_secs: u64) {
        let policy = RetryPolicy::default();
        assert_eq!(policy.next_delay(attempts), Duration::from_secs(expected_secs));
    }

    #[test]
    fn large_attempt_budget_from_config_never_panics() {
        let config = crate::config::FeedgenConfig::from_toml_str("[bus]\nmax_attempts = 100").unwrap();
        let policy = RetryPolicy::from(&config.bus);
        for attempts in 1..=config.bus.max_attempts {
            assert!(policy.next_delay(attempts) <= policy.max_delay);
        }
    }

    #[test]
    fn zero_base_delay_stays_zero() {
        let policy = RetryPolicy {
            base_delay: Duration::ZERO,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.next_delay(1), Duration::ZERO);
        assert_eq!(policy.next_delay(5_000), Duration::ZERO);
    }

    #[test]
    fn budget_is_inclusive() {
        let policy = RetryPolicy::default();
        assert!(!policy.attempts_exhausted(4));
        assert!(policy.attempts_exhausted(5));
    }
}
